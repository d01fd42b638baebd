//! Collaborator ports for exercise generation, feedback, and speech.
//!
//! These traits are implemented by the `learnify-providers` and
//! `learnify-speech` crates respectively. The engine only ever sees these
//! interfaces, so every collaborator can be replaced with a deterministic
//! test double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, GenerationError};
use crate::model::{Answer, Category, DifficultyHint, Exercise, Grade, Subject};

// ---------------------------------------------------------------------------
// Exercise generation
// ---------------------------------------------------------------------------

/// Trait for backends that generate exercises.
#[async_trait]
pub trait ExerciseGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate one exercise. Implementations must validate the
    /// collaborator's payload against the fixed per-subject shape and fail
    /// the request on a mismatch.
    async fn generate(&self, request: &ExerciseRequest) -> Result<Exercise, GenerationError>;
}

/// Request for one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRequest {
    /// Learner display name (personalizes the prompt).
    pub learner_name: String,
    /// School grade, drives difficulty and vocabulary.
    pub grade: Grade,
    pub subject: Subject,
    #[serde(default)]
    pub category: Option<Category>,
    /// Adaptivity signal derived from the previous question's outcome.
    pub hint: DifficultyHint,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Trait for backends that produce encouragement/explanation text.
///
/// The returned text is opaque: correctness is decided by the evaluator
/// before this collaborator is consulted and is never re-derived from it.
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn feedback(&self, request: &FeedbackRequest) -> Result<String, GenerationError>;
}

/// Request for feedback text on a resolved question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub learner_name: String,
    pub grade: Grade,
    pub question: String,
    pub submitted: String,
    pub canonical: Answer,
    /// Verdict already computed by the evaluator.
    pub correct: bool,
}

// ---------------------------------------------------------------------------
// Speech capture
// ---------------------------------------------------------------------------

/// A transcript update from the recognizer. Text is cumulative for the
/// utterance; events arrive in non-decreasing finality order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Interim hypothesis, may still change.
    Partial { text: String },
    /// Finalized text so far. Only this is aligned against the reference.
    Final { text: String },
}

impl TranscriptEvent {
    pub fn text(&self) -> &str {
        match self {
            TranscriptEvent::Partial { text } | TranscriptEvent::Final { text } => text,
        }
    }
}

/// Everything the capture source can push at the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Transcript(TranscriptEvent),
    /// The underlying stream stopped. While listening this is transient
    /// and the session restarts capture; after stopping it is expected.
    Ended,
}

/// Continuous speech-capture capability with start/stop controls.
///
/// Events are pushed into the session by whatever owns the backend; the
/// trait only covers the control surface so the engine can restart a
/// stream that ended unexpectedly.
pub trait SpeechCapture: Send {
    /// Whether this platform can capture speech at all. A `false` here
    /// disables reading-practice mode, it is not retryable.
    fn is_supported(&self) -> bool;

    fn start(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// Speech playback
// ---------------------------------------------------------------------------

/// Playback lifecycle signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started { text: String },
    Ended { text: String },
    Error { text: String, message: String },
}

/// Word/phrase pronunciation sink. Fire-and-forget, single active
/// utterance: starting a new one interrupts whatever is playing.
pub trait SpeechPlayback: Send {
    fn speak(&mut self, text: &str);

    /// Stop the current utterance, if any.
    fn cancel(&mut self);
}
