//! The `learnify practice` command.
//!
//! Drives one session interactively in the terminal. The terminal stands
//! in for the speech recognizer during reading practice: the learner reads
//! aloud and types what they said, which is fed to the session as the
//! finalized transcript.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};

use learnify_core::aligner::WordStatus;
use learnify_core::model::{
    Category, EnglishCategory, Exercise, SessionOutcome, SessionSummary, Subject, Visualization,
};
use learnify_core::progress::fold_progress;
use learnify_core::session::{
    Advance, FetchOutcome, QuestionOutcome, SessionController, SessionObserver, SessionPhase,
};
use learnify_core::traits::{CaptureEvent, ExerciseGenerator, FeedbackSource, TranscriptEvent};
use learnify_speech::{ConsolePlayback, ManualCapture};

use super::open_store;

/// Console session observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_phase(&self, phase: SessionPhase) {
        tracing::debug!("phase: {phase:?}");
    }

    fn on_exercise(&self, _: &Exercise) {}

    fn on_alignment(&self, _: &[WordStatus]) {}

    fn on_resolved(&self, index: usize, outcome: &QuestionOutcome) {
        match outcome {
            QuestionOutcome::Answered { correct } => {
                tracing::info!("question {} resolved, correct={correct}", index + 1)
            }
            QuestionOutcome::Read { score } => tracing::info!(
                "sentence {} read, {} wpm, {}% accuracy",
                index + 1,
                score.wpm,
                score.accuracy
            ),
        }
    }

    fn on_complete(&self, _: &SessionSummary) {}
}

pub async fn execute(
    learner_name: String,
    subject: String,
    category: Option<String>,
    config_path: Option<PathBuf>,
    store_override: Option<PathBuf>,
) -> Result<()> {
    let (config, mut roster) = open_store(config_path.as_deref(), store_override)?;
    anyhow::ensure!(
        !config.api_key.is_empty(),
        "no API key configured; run `learnify init` and set GEMINI_API_KEY"
    );

    let subject: Subject = subject.parse().map_err(anyhow::Error::msg)?;
    let category = match (subject, category) {
        (Subject::Hebrew, None) => None,
        (Subject::Hebrew, Some(_)) => bail!("hebrew sessions have no category"),
        (_, Some(c)) => Some(Category::parse_for(subject, &c).map_err(anyhow::Error::msg)?),
        (_, None) => bail!("--category is required for {subject}"),
    };

    let learner = roster
        .find_learner(&learner_name)
        .cloned()
        .with_context(|| {
            format!("no learner named {learner_name}; add one with `learnify learners add`")
        })?;

    let client = Arc::new(config.create_client());
    let generator: Arc<dyn ExerciseGenerator> = client.clone();
    let feedback: Arc<dyn FeedbackSource> = client;

    let is_reading = matches!(
        category,
        Some(Category::English(EnglishCategory::ReadingPractice))
    );

    let mut session =
        SessionController::new(learner.clone(), subject, category, generator, feedback)
            .with_observer(Arc::new(ConsoleObserver))
            .with_playback(Box::new(ConsolePlayback::new()));
    if is_reading {
        session = session
            .with_capture(Box::new(ManualCapture::new()))
            .context("reading practice is unavailable")?;
    }

    println!(
        "Starting a {} session for {} (grade {}).",
        subject, learner.name, learner.grade
    );

    let summary = run_session(&mut session).await?;

    let previous = roster.progress_for(learner.id).get(subject);
    let updated = fold_progress(previous, &summary);
    roster.record_progress(learner.id, subject, updated)?;

    print_summary(&summary, previous, updated);
    Ok(())
}

async fn run_session(session: &mut SessionController) -> Result<SessionSummary> {
    loop {
        // A failed fetch leaves the session untouched; offer a retry.
        loop {
            println!("\nLoading your question...");
            match session.load_next().await? {
                FetchOutcome::Presented => break,
                FetchOutcome::Failed(e) => {
                    eprintln!("Oops! We had trouble generating a question ({e}).");
                    let line = prompt_line("Press Enter to try again, or type q to quit")?;
                    if line.eq_ignore_ascii_case("q") {
                        bail!("session abandoned");
                    }
                }
                FetchOutcome::Discarded => {}
            }
        }

        println!(
            "— Question {} of {} —",
            session.question_index() + 1,
            session.question_target()
        );
        let exercise = session
            .exercise()
            .cloned()
            .context("no exercise after a successful fetch")?;

        if exercise.is_reading() {
            run_reading_question(session, &exercise)?;
        } else {
            run_quiz_question(session, &exercise).await?;
        }

        match session.advance()? {
            Advance::Next => {}
            Advance::Complete(summary) => return Ok(summary),
        }
    }
}

async fn run_quiz_question(
    session: &mut SessionController,
    exercise: &Exercise,
) -> Result<()> {
    if let Some(passage) = exercise.passage() {
        println!("\n{passage}\n");
        println!("(type `say <word>` to hear any word read aloud)");
    }
    if let Exercise::VisualMath { visualization, .. } = exercise {
        render_visualization(visualization);
    }
    if let Some(question) = exercise.question() {
        println!("\n{question}");
    }
    if let Some(options) = exercise.options() {
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    }

    let answer = loop {
        let line = prompt_line("Your answer")?;
        if let Some(word) = line.strip_prefix("say ") {
            session.pronounce(word);
            continue;
        }
        if line.is_empty() {
            continue;
        }
        break resolve_option(exercise, line);
    };

    let feedback = session.submit_answer(&answer).await?;
    if feedback.correct {
        println!("\n✅ Correct!");
    } else {
        println!("\n❌ Not quite.");
    }
    println!("{}", feedback.text);
    prompt_line("Press Enter to continue")?;
    Ok(())
}

/// A bare number selects a multiple-choice option; anything else is the
/// literal answer.
fn resolve_option(exercise: &Exercise, line: String) -> String {
    if let Some(options) = exercise.options() {
        if let Ok(choice) = line.parse::<usize>() {
            if (1..=options.len()).contains(&choice) {
                return options[choice - 1].clone();
            }
        }
    }
    line
}

fn run_reading_question(session: &mut SessionController, exercise: &Exercise) -> Result<()> {
    let Exercise::ReadingPractice { sentence } = exercise else {
        bail!("reading question without a sentence");
    };

    println!("\nRead this sentence aloud:\n\n  {sentence}\n");
    prompt_line("Press Enter to start reading")?;
    session.start_listening(now_ms())?;

    let spoken = prompt_line("Read aloud, then type what you said")?;
    session.handle_capture_event(CaptureEvent::Transcript(TranscriptEvent::Final {
        text: spoken,
    }));

    let score = session.stop_listening(now_ms())?;

    if let Some(statuses) = session.alignment() {
        let rendered: Vec<String> = sentence
            .split_whitespace()
            .zip(statuses)
            .map(|(word, status)| match status {
                WordStatus::Correct => format!("{word} ✓"),
                WordStatus::Incorrect => format!("{word} ✗"),
                WordStatus::Pending => format!("{word} ·"),
            })
            .collect();
        println!("\n  {}", rendered.join("  "));
    }
    println!("\n{} words per minute, {}% accuracy", score.wpm, score.accuracy);
    prompt_line("Press Enter to continue")?;
    Ok(())
}

fn render_visualization(visualization: &Visualization) {
    let groups: Vec<String> = visualization
        .elements
        .iter()
        .map(|e| e.emoji.repeat(e.count as usize))
        .collect();
    println!(
        "\n  {}",
        groups.join(&format!(" {} ", visualization.operation))
    );
}

fn print_summary(summary: &SessionSummary, previous: f64, updated: f64) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    match &summary.outcome {
        SessionOutcome::Quiz { correct, incorrect } => {
            table.set_header(vec!["Correct", "Incorrect"]);
            table.add_row(vec![correct.to_string(), incorrect.to_string()]);
        }
        SessionOutcome::Reading {
            avg_wpm,
            avg_accuracy,
        } => {
            table.set_header(vec!["Avg WPM", "Avg Accuracy"]);
            table.add_row(vec![avg_wpm.to_string(), format!("{avg_accuracy}%")]);
        }
    }
    println!("\nSession complete!\n{table}");
    println!(
        "{} progress: {:.0}% -> {:.0}%",
        summary.subject, previous, updated
    );
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    Ok(line.trim().to_string())
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
