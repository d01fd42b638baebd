//! Classified error types.
//!
//! Defined in `learnify-core` so the session engine can match on variants
//! for retry and recovery decisions without string matching. Every failure
//! is scoped to a single fetch or capability — there is no fatal class.

use thiserror::Error;

use crate::session::SessionPhase;

/// Errors from the exercise-generation or feedback collaborator.
///
/// All of these surface to the session as a retryable fetch failure: the
/// question index and correct-count are left untouched and the fetch can
/// simply be re-invoked.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response did not match the expected exercise shape for the
    /// requested subject. Treated like any other generation failure.
    #[error("invalid exercise payload: {0}")]
    InvalidExercise(String),
}

impl GenerationError {
    /// Returns `true` if this error is permanent and a provider-internal
    /// retry loop should not re-attempt it. The session-level semantics
    /// are unaffected: the user can always re-invoke the fetch.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            GenerationError::AuthFailed(_) | GenerationError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            GenerationError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors from the speech-capture capability.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Speech recognition is not available on this platform. Disables
    /// reading-practice mode entirely; there is nothing to retry.
    #[error("speech recognition is not supported on this platform")]
    Unsupported,

    /// The capture backend failed to start or stop.
    #[error("capture failed: {0}")]
    Backend(String),
}

/// Session state-machine misuse. These guard phase transitions and point
/// at caller bugs rather than runtime conditions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{operation} is not valid in phase {actual:?}")]
    Phase {
        operation: &'static str,
        actual: SessionPhase,
    },

    #[error("an exercise request is already in flight")]
    FetchInFlight,

    #[error("no active exercise for this operation")]
    NoActiveExercise,

    #[error("this session has no speech-capture port attached")]
    ReadingUnavailable,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_classification() {
        assert!(GenerationError::AuthFailed("bad key".into()).is_permanent());
        assert!(GenerationError::ModelNotFound("nope".into()).is_permanent());
        assert!(!GenerationError::Network("reset".into()).is_permanent());
        assert!(!GenerationError::InvalidExercise("shape".into()).is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        let limited = GenerationError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(limited.retry_after_ms(), Some(5000));
        assert_eq!(GenerationError::Timeout(30).retry_after_ms(), None);
    }
}
