//! Full reading-practice session driven by scripted capture events.

use std::sync::Arc;

use learnify_core::aligner::WordStatus;
use learnify_core::model::{
    Category, EnglishCategory, Exercise, Grade, Learner, SessionOutcome, Subject,
};
use learnify_core::progress::fold_progress;
use learnify_core::session::{Advance, SessionConfig, SessionController, SessionPhase};
use learnify_core::traits::{CaptureEvent, TranscriptEvent};
use learnify_providers::{MockFeedback, MockGenerator};
use learnify_speech::{replay, ManualCapture};

fn reading_session(sentences: &[&str], target: usize) -> (SessionController, Arc<learnify_speech::CaptureProbe>) {
    let generator = Arc::new(MockGenerator::new(
        sentences
            .iter()
            .map(|s| {
                Ok(Exercise::ReadingPractice {
                    sentence: s.to_string(),
                })
            })
            .collect(),
    ));
    let capture = ManualCapture::new();
    let probe = capture.probe();
    let session = SessionController::new(
        Learner::new("Noa", Grade::new(2).unwrap()),
        Subject::English,
        Some(Category::English(EnglishCategory::ReadingPractice)),
        generator,
        Arc::new(MockFeedback::with_fixed_response("nice")),
    )
    .with_config(SessionConfig {
        question_target: target,
    })
    .with_capture(Box::new(capture))
    .expect("manual capture is supported");
    (session, probe)
}

#[tokio::test]
async fn scripted_session_scores_and_accumulates_progress() {
    let (mut session, probe) = reading_session(&["A big pig sat.", "The fish swims."], 2);

    // Sentence 1: read perfectly in 30 seconds.
    session.load_next().await.unwrap();
    session.start_listening(0).unwrap();
    assert!(probe.is_running());
    replay(
        &mut session,
        [
            CaptureEvent::Transcript(TranscriptEvent::Partial {
                text: "a".into(),
            }),
            CaptureEvent::Transcript(TranscriptEvent::Final {
                text: "a big".into(),
            }),
            CaptureEvent::Transcript(TranscriptEvent::Final {
                text: "a big pig sat".into(),
            }),
        ],
    );
    let score = session.stop_listening(30_000).unwrap();
    assert_eq!(score.wpm, 8);
    assert_eq!(score.accuracy, 100);
    assert!(!probe.is_running());
    assert!(matches!(session.advance().unwrap(), Advance::Next));

    // Sentence 2: one word wrong, one minute elapsed.
    session.load_next().await.unwrap();
    session.start_listening(0).unwrap();
    replay(
        &mut session,
        [CaptureEvent::Transcript(TranscriptEvent::Final {
            text: "the fish swam".into(),
        })],
    );
    let score = session.stop_listening(60_000).unwrap();
    assert_eq!(score.accuracy, 67);
    assert_eq!(score.wpm, 2);

    let summary = match session.advance().unwrap() {
        Advance::Complete(summary) => summary,
        Advance::Next => panic!("session should be complete"),
    };
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(
        summary.outcome,
        SessionOutcome::Reading {
            avg_wpm: 5,
            avg_accuracy: 84,
        }
    );

    // Reading practice grants the flat delta regardless of accuracy.
    assert_eq!(fold_progress(85.0, &summary), 100.0);
}

#[tokio::test]
async fn transient_stream_end_is_recovered_by_restart() {
    let (mut session, probe) = reading_session(&["one two three"], 1);

    session.load_next().await.unwrap();
    session.start_listening(0).unwrap();
    assert_eq!(probe.start_count(), 1);

    replay(
        &mut session,
        [
            CaptureEvent::Transcript(TranscriptEvent::Final {
                text: "one".into(),
            }),
            // The recognizer dies mid-sentence; the session restarts it.
            CaptureEvent::Ended,
            CaptureEvent::Transcript(TranscriptEvent::Final {
                text: "one two".into(),
            }),
        ],
    );
    assert_eq!(probe.start_count(), 2);
    assert!(probe.is_running());
    assert_eq!(
        session.alignment().unwrap(),
        &[
            WordStatus::Correct,
            WordStatus::Correct,
            WordStatus::Pending,
        ]
    );

    session.stop_listening(10_000).unwrap();
    // Expected end after stopping must not restart capture.
    replay(&mut session, [CaptureEvent::Ended]);
    assert_eq!(probe.start_count(), 2);
    assert!(!probe.is_running());
}
