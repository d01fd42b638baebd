//! Quiz answer evaluation.
//!
//! The verdict is a local string comparison; the feedback collaborator is
//! only consulted for encouragement text and can never flip it.

use std::sync::Arc;

use crate::model::{Answer, Feedback, Grade};
use crate::traits::{FeedbackRequest, FeedbackSource};

/// Whether a submitted answer matches the canonical one.
///
/// Both sides are trimmed and lowercased; numeric answers go through the
/// same string comparison with no numeric tolerance.
pub fn is_correct_answer(submitted: &str, canonical: &Answer) -> bool {
    submitted.trim().to_lowercase() == canonical.to_string().trim().to_lowercase()
}

/// Evaluates answers and fetches feedback text for them.
pub struct AnswerEvaluator {
    feedback: Arc<dyn FeedbackSource>,
}

impl AnswerEvaluator {
    pub fn new(feedback: Arc<dyn FeedbackSource>) -> Self {
        Self { feedback }
    }

    /// Compute the verdict and ask the collaborator for feedback text.
    ///
    /// A collaborator failure is scoped to this fetch: the verdict stands
    /// and a canned line is substituted.
    pub async fn evaluate(
        &self,
        learner_name: &str,
        grade: Grade,
        question: &str,
        submitted: &str,
        canonical: &Answer,
    ) -> Feedback {
        let correct = is_correct_answer(submitted, canonical);

        let request = FeedbackRequest {
            learner_name: learner_name.to_string(),
            grade,
            question: question.to_string(),
            submitted: submitted.to_string(),
            canonical: canonical.clone(),
            correct,
        };

        let text = match self.feedback.feedback(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("feedback fetch failed, using fallback text: {e}");
                if correct {
                    "Great job! That's right.".to_string()
                } else {
                    format!("Good try! The answer was {canonical}.")
                }
            }
        };

        Feedback { correct, text }
    }
}
