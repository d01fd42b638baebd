//! Mock collaborators for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use learnify_core::error::GenerationError;
use learnify_core::model::Exercise;
use learnify_core::traits::{
    ExerciseGenerator, ExerciseRequest, FeedbackRequest, FeedbackSource,
};

/// A mock exercise generator for testing the session engine without real
/// API calls.
///
/// Pops queued responses in order, falling back to a fixed default once
/// the queue runs dry.
pub struct MockGenerator {
    queued: Mutex<VecDeque<Result<Exercise, GenerationError>>>,
    default_exercise: Exercise,
    call_count: AtomicU32,
    last_request: Mutex<Option<ExerciseRequest>>,
}

impl MockGenerator {
    /// Create a mock that replays the given responses in order.
    pub fn new(responses: Vec<Result<Exercise, GenerationError>>) -> Self {
        Self {
            queued: Mutex::new(responses.into()),
            default_exercise: Exercise::TextMath {
                question: "What is 1 + 1?".to_string(),
                options: None,
                answer: 2.0,
            },
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same exercise.
    pub fn with_fixed_exercise(exercise: Exercise) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_exercise: exercise,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this generator.
    pub fn last_request(&self) -> Option<ExerciseRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExerciseGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &ExerciseRequest) -> Result<Exercise, GenerationError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_exercise.clone()))
    }
}

/// A mock feedback source returning a fixed line.
pub struct MockFeedback {
    text: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<FeedbackRequest>>,
}

impl MockFeedback {
    pub fn with_fixed_response(text: &str) -> Self {
        Self {
            text: text.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<FeedbackRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackSource for MockFeedback {
    async fn feedback(&self, request: &FeedbackRequest) -> Result<String, GenerationError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnify_core::model::{DifficultyHint, Grade, Subject};

    fn request(hint: DifficultyHint) -> ExerciseRequest {
        ExerciseRequest {
            learner_name: "Noa".into(),
            grade: Grade::new(2).unwrap(),
            subject: Subject::Math,
            category: None,
            hint,
        }
    }

    #[tokio::test]
    async fn replays_queue_then_default() {
        let generator = MockGenerator::new(vec![Ok(Exercise::ReadingPractice {
            sentence: "a big pig".into(),
        })]);

        let first = generator.generate(&request(DifficultyHint::First)).await.unwrap();
        assert!(first.is_reading());

        let second = generator
            .generate(&request(DifficultyHint::Correct))
            .await
            .unwrap();
        assert!(!second.is_reading());
        assert_eq!(generator.call_count(), 2);
        assert_eq!(
            generator.last_request().unwrap().hint,
            DifficultyHint::Correct
        );
    }

    #[tokio::test]
    async fn fixed_feedback() {
        let feedback = MockFeedback::with_fixed_response("Nice work!");
        let text = feedback
            .feedback(&FeedbackRequest {
                learner_name: "Noa".into(),
                grade: Grade::new(2).unwrap(),
                question: "q".into(),
                submitted: "7".into(),
                canonical: learnify_core::model::Answer::Number(7.0),
                correct: true,
            })
            .await
            .unwrap();
        assert_eq!(text, "Nice work!");
        assert_eq!(feedback.call_count(), 1);
        assert!(feedback.last_request().unwrap().correct);
    }
}
