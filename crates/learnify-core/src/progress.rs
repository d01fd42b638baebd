//! Cumulative progress folding.
//!
//! The only writer of a learner's per-subject progress value. Quiz
//! sessions earn progress proportional to correctness; reading sessions
//! earn a flat amount regardless of measured accuracy.

use crate::model::{SessionOutcome, SessionSummary, QUESTIONS_PER_SESSION};

/// Progress earned by a fully correct session, in percentage points.
const FULL_SESSION_DELTA: f64 = 20.0;

/// Fold a completed session into the learner's previous progress.
///
/// Returns the new per-subject percentage, capped at 100. Invoked exactly
/// once per completed session.
pub fn fold_progress(previous: f64, summary: &SessionSummary) -> f64 {
    let delta = match &summary.outcome {
        SessionOutcome::Quiz { correct, .. } => {
            (*correct as f64 / QUESTIONS_PER_SESSION as f64) * FULL_SESSION_DELTA
        }
        // Reading practice always grants the full delta.
        SessionOutcome::Reading { .. } => FULL_SESSION_DELTA,
    };
    (previous + delta).min(100.0)
}
