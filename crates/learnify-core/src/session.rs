//! The practice-session state machine.
//!
//! Drives a bounded sequence of questions for one subject: requests
//! exercises with a difficulty hint derived from the previous outcome,
//! resolves each question through answer evaluation or transcript
//! alignment, and emits a summary exactly once on completion.
//!
//! A session is single-owner: the controller holds the only mutable state,
//! collaborators are injected behind traits, and every external event
//! enters through an explicit method call.

use std::sync::Arc;

use crate::aligner::{WordAligner, WordStatus};
use crate::error::{CaptureError, GenerationError, SessionError};
use crate::evaluator::AnswerEvaluator;
use crate::model::{
    Category, DifficultyHint, EnglishCategory, Exercise, Feedback, Learner, SessionOutcome,
    SessionSummary, Subject, QUESTIONS_PER_SESSION,
};
use crate::scorer::{self, SentenceScore};
use crate::traits::{
    CaptureEvent, ExerciseGenerator, ExerciseRequest, FeedbackRequest, FeedbackSource,
    SpeechCapture, SpeechPlayback, TranscriptEvent,
};

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Awaiting the next exercise from the generation collaborator.
    Loading,
    /// Quiz question presented, awaiting a submitted answer.
    AwaitingAnswer,
    /// Reading sentence presented, not yet listening.
    Idle,
    /// Capturing speech and aligning the transcript.
    Listening,
    /// Quiz question resolved, feedback shown, awaiting advance.
    Feedback,
    /// Reading sentence resolved, score shown, awaiting advance.
    Finished,
    /// Terminal. The summary has been emitted.
    Complete,
}

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fixed number of questions per session.
    pub question_target: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_target: QUESTIONS_PER_SESSION,
        }
    }
}

/// How one question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Answered { correct: bool },
    Read { score: SentenceScore },
}

/// Session progress reporting trait.
pub trait SessionObserver: Send + Sync {
    fn on_phase(&self, phase: SessionPhase);
    fn on_exercise(&self, exercise: &Exercise);
    fn on_alignment(&self, statuses: &[WordStatus]);
    fn on_resolved(&self, index: usize, outcome: &QuestionOutcome);
    fn on_complete(&self, summary: &SessionSummary);
}

/// No-op session observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_phase(&self, _: SessionPhase) {}
    fn on_exercise(&self, _: &Exercise) {}
    fn on_alignment(&self, _: &[WordStatus]) {}
    fn on_resolved(&self, _: usize, _: &QuestionOutcome) {}
    fn on_complete(&self, _: &SessionSummary) {}
}

/// Handle for an in-flight exercise fetch. Carries the epoch at request
/// time so a response that arrives after `abandon` is recognized as stale.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub epoch: u64,
    pub request: ExerciseRequest,
}

/// What applying a generation response did to the session.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The exercise is live and the phase advanced.
    Presented,
    /// The response belonged to an abandoned question and was dropped.
    Discarded,
    /// The fetch failed; the session stayed in `Loading` untouched and
    /// the fetch can be re-invoked.
    Failed(GenerationError),
}

/// Result of advancing past a resolved question.
#[derive(Debug)]
pub enum Advance {
    /// More questions remain; the session is back in `Loading`.
    Next,
    /// The target was reached; the summary is emitted exactly once.
    Complete(SessionSummary),
}

/// Orchestrates one practice session from first fetch to summary.
pub struct SessionController {
    learner: Learner,
    subject: Subject,
    category: Option<Category>,
    config: SessionConfig,

    generator: Arc<dyn ExerciseGenerator>,
    evaluator: AnswerEvaluator,
    observer: Arc<dyn SessionObserver>,
    capture: Option<Box<dyn SpeechCapture>>,
    playback: Option<Box<dyn SpeechPlayback>>,

    phase: SessionPhase,
    index: usize,
    correct_count: u32,
    outcomes: Vec<QuestionOutcome>,
    exercise: Option<Exercise>,
    aligner: Option<WordAligner>,
    scores: Vec<SentenceScore>,
    listening_started_ms: Option<u64>,
    epoch: u64,
    in_flight: bool,
}

impl SessionController {
    pub fn new(
        learner: Learner,
        subject: Subject,
        category: Option<Category>,
        generator: Arc<dyn ExerciseGenerator>,
        feedback: Arc<dyn FeedbackSource>,
    ) -> Self {
        Self {
            learner,
            subject,
            category,
            config: SessionConfig::default(),
            generator,
            evaluator: AnswerEvaluator::new(feedback),
            observer: Arc::new(NoopObserver),
            capture: None,
            playback: None,
            phase: SessionPhase::Loading,
            index: 0,
            correct_count: 0,
            outcomes: Vec::new(),
            exercise: None,
            aligner: None,
            scores: Vec::new(),
            listening_started_ms: None,
            epoch: 0,
            in_flight: false,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Attach a speech-capture port. An unsupported platform is rejected
    /// here, disabling reading practice up front.
    pub fn with_capture(
        mut self,
        capture: Box<dyn SpeechCapture>,
    ) -> Result<Self, CaptureError> {
        if !capture.is_supported() {
            return Err(CaptureError::Unsupported);
        }
        self.capture = Some(capture);
        Ok(self)
    }

    pub fn with_playback(mut self, playback: Box<dyn SpeechPlayback>) -> Self {
        self.playback = Some(playback);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// 0-based index of the current question, always < the target.
    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn question_target(&self) -> usize {
        self.config.question_target
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    /// Current word statuses for the live reading sentence.
    pub fn alignment(&self) -> Option<&[WordStatus]> {
        self.aligner.as_ref().map(|a| a.statuses())
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            tracing::debug!("session phase: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.observer.on_phase(phase);
        }
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        expected: SessionPhase,
    ) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::Phase {
                operation,
                actual: self.phase,
            })
        }
    }

    /// The hint for the upcoming question: `first` for question 0, then
    /// the previous quiz verdict. Reading sentences resolve without a
    /// verdict, so they keep the first-question phrasing.
    fn next_hint(&self) -> DifficultyHint {
        if self.index == 0 {
            return DifficultyHint::First;
        }
        match self.outcomes.last() {
            Some(QuestionOutcome::Answered { correct: true }) => DifficultyHint::Correct,
            Some(QuestionOutcome::Answered { correct: false }) => DifficultyHint::Incorrect,
            Some(QuestionOutcome::Read { .. }) | None => DifficultyHint::First,
        }
    }

    /// Start fetching the next exercise. Only valid in `Loading`, and only
    /// one request may be in flight per question.
    pub fn begin_fetch(&mut self) -> Result<FetchTicket, SessionError> {
        self.expect_phase("begin_fetch", SessionPhase::Loading)?;
        if self.in_flight {
            return Err(SessionError::FetchInFlight);
        }
        self.in_flight = true;
        Ok(FetchTicket {
            epoch: self.epoch,
            request: ExerciseRequest {
                learner_name: self.learner.name.clone(),
                grade: self.learner.grade,
                subject: self.subject,
                category: self.category,
                hint: self.next_hint(),
            },
        })
    }

    /// Apply a generation response. A response whose epoch predates an
    /// `abandon` call is discarded without touching any session state.
    pub fn resolve_fetch(
        &mut self,
        epoch: u64,
        result: Result<Exercise, GenerationError>,
    ) -> FetchOutcome {
        if epoch != self.epoch {
            tracing::debug!("discarding stale exercise response (epoch {epoch})");
            return FetchOutcome::Discarded;
        }
        self.in_flight = false;
        match result {
            Ok(exercise) => {
                let next_phase = if exercise.is_reading() {
                    SessionPhase::Idle
                } else {
                    SessionPhase::AwaitingAnswer
                };
                if let Exercise::ReadingPractice { sentence } = &exercise {
                    self.aligner = Some(WordAligner::new(sentence));
                }
                self.observer.on_exercise(&exercise);
                self.exercise = Some(exercise);
                self.set_phase(next_phase);
                FetchOutcome::Presented
            }
            Err(e) => {
                tracing::warn!("exercise fetch failed: {e}");
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Fetch and present the next exercise in one call.
    pub async fn load_next(&mut self) -> Result<FetchOutcome, SessionError> {
        let ticket = self.begin_fetch()?;
        let generator = Arc::clone(&self.generator);
        let result = generator.generate(&ticket.request).await;
        Ok(self.resolve_fetch(ticket.epoch, result))
    }

    /// Navigating away from the session: any in-flight response becomes
    /// stale, and an active capture stream is stopped.
    pub fn abandon(&mut self) {
        self.epoch += 1;
        self.in_flight = false;
        if self.phase == SessionPhase::Listening {
            if let Some(capture) = self.capture.as_mut() {
                capture.stop();
            }
        }
    }

    /// Resolve a quiz question. Computes the verdict, fetches feedback
    /// text, and moves to `Feedback`.
    pub async fn submit_answer(&mut self, submitted: &str) -> Result<Feedback, SessionError> {
        self.expect_phase("submit_answer", SessionPhase::AwaitingAnswer)?;
        let (question, canonical) = match self.exercise.as_ref() {
            Some(exercise) => match (exercise.question(), exercise.canonical_answer()) {
                (Some(q), Some(a)) => (q.to_string(), a),
                _ => return Err(SessionError::NoActiveExercise),
            },
            None => return Err(SessionError::NoActiveExercise),
        };

        let feedback = self
            .evaluator
            .evaluate(
                &self.learner.name,
                self.learner.grade,
                &question,
                submitted,
                &canonical,
            )
            .await;

        if feedback.correct {
            self.correct_count += 1;
        }
        let outcome = QuestionOutcome::Answered {
            correct: feedback.correct,
        };
        self.observer.on_resolved(self.index, &outcome);
        self.outcomes.push(outcome);
        self.set_phase(SessionPhase::Feedback);
        Ok(feedback)
    }

    /// Begin capturing speech for the live reading sentence.
    pub fn start_listening(&mut self, now_ms: u64) -> Result<(), SessionError> {
        self.expect_phase("start_listening", SessionPhase::Idle)?;
        if self.aligner.is_none() {
            return Err(SessionError::NoActiveExercise);
        }
        let capture = self
            .capture
            .as_mut()
            .ok_or(SessionError::ReadingUnavailable)?;
        capture.start()?;
        if let Some(aligner) = self.aligner.as_mut() {
            aligner.reset();
        }
        self.listening_started_ms = Some(now_ms);
        self.set_phase(SessionPhase::Listening);
        Ok(())
    }

    /// Consume one capture event.
    ///
    /// Only finalized transcript text is aligned; interim hypotheses never
    /// touch word statuses. Outside `Listening` the alignment is frozen
    /// and events are dropped.
    pub fn handle_capture_event(&mut self, event: CaptureEvent) {
        if self.phase != SessionPhase::Listening {
            return;
        }
        match event {
            CaptureEvent::Transcript(TranscriptEvent::Final { text }) => {
                if let Some(aligner) = self.aligner.as_mut() {
                    if aligner.apply_transcript(&text) {
                        self.observer.on_alignment(aligner.statuses());
                    }
                }
            }
            CaptureEvent::Transcript(TranscriptEvent::Partial { .. }) => {}
            CaptureEvent::Ended => {
                // The stream stopped while we still want it: restart to
                // keep capture continuous.
                tracing::debug!("capture ended while listening, restarting");
                if let Some(capture) = self.capture.as_mut() {
                    if let Err(e) = capture.start() {
                        tracing::warn!("capture restart failed: {e}");
                    }
                }
            }
        }
    }

    /// Stop listening, freeze the alignment, and score the sentence.
    pub fn stop_listening(&mut self, now_ms: u64) -> Result<SentenceScore, SessionError> {
        self.expect_phase("stop_listening", SessionPhase::Listening)?;
        if let Some(capture) = self.capture.as_mut() {
            capture.stop();
        }
        let statuses = self
            .aligner
            .as_ref()
            .map(|a| a.statuses().to_vec())
            .ok_or(SessionError::NoActiveExercise)?;
        let started = self.listening_started_ms.take().unwrap_or(now_ms);
        let score = scorer::score_sentence(started, now_ms, &statuses);
        self.scores.push(score);
        let outcome = QuestionOutcome::Read { score };
        self.observer.on_resolved(self.index, &outcome);
        self.outcomes.push(outcome);
        self.set_phase(SessionPhase::Finished);
        Ok(score)
    }

    /// Pronounce a word through the playback port. Fire-and-forget; the
    /// port interrupts any currently playing utterance.
    pub fn pronounce(&mut self, word: &str) {
        let cleaned = crate::aligner::strip_punctuation(word.trim());
        if cleaned.is_empty() {
            return;
        }
        if let Some(playback) = self.playback.as_mut() {
            playback.speak(&cleaned);
        }
    }

    /// Move past a resolved question: back to `Loading`, or to `Complete`
    /// with the summary once the target is reached.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        match self.phase {
            SessionPhase::Feedback | SessionPhase::Finished => {}
            actual => {
                return Err(SessionError::Phase {
                    operation: "advance",
                    actual,
                })
            }
        }
        self.exercise = None;
        self.aligner = None;
        self.index += 1;
        if self.index >= self.config.question_target {
            let summary = self.build_summary();
            self.set_phase(SessionPhase::Complete);
            self.observer.on_complete(&summary);
            Ok(Advance::Complete(summary))
        } else {
            self.set_phase(SessionPhase::Loading);
            Ok(Advance::Next)
        }
    }

    fn is_reading_session(&self) -> bool {
        matches!(
            self.category,
            Some(Category::English(EnglishCategory::ReadingPractice))
        )
    }

    fn build_summary(&self) -> SessionSummary {
        let outcome = if self.is_reading_session() {
            let averages = scorer::session_average(&self.scores);
            SessionOutcome::Reading {
                avg_wpm: averages.wpm,
                avg_accuracy: averages.accuracy,
            }
        } else {
            SessionOutcome::Quiz {
                correct: self.correct_count,
                incorrect: self.config.question_target as u32 - self.correct_count,
            }
        };
        SessionSummary {
            subject: self.subject,
            category: self.category,
            outcome,
        }
    }
}
