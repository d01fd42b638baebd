//! learnify-providers — Exercise-generation and feedback integrations.
//!
//! Implements the `ExerciseGenerator` and `FeedbackSource` traits over the
//! Gemini `generateContent` API, validates the collaborator's JSON against
//! the fixed per-subject exercise shapes, and ships deterministic mocks
//! for testing the session engine without real API calls.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod schema;

pub use config::{load_config, LearnifyConfig};
pub use gemini::GeminiClient;
pub use mock::{MockFeedback, MockGenerator};
