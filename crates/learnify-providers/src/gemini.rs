//! Gemini API collaborator implementation.
//!
//! One HTTP client serves both ports: exercise generation (JSON
//! constrained by a per-subject response schema) and feedback text
//! (free-form).

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use learnify_core::error::GenerationError;
use learnify_core::model::Exercise;
use learnify_core::traits::{
    ExerciseGenerator, ExerciseRequest, FeedbackRequest, FeedbackSource,
};

use crate::{prompt, schema};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini-backed exercise generation and feedback.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(text: String) -> Self {
        Self {
            parts: vec![GeminiPart { text }],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiClient {
    /// One `generateContent` round trip, returning the concatenated text
    /// of the first candidate.
    async fn generate_content(
        &self,
        system: Option<String>,
        user: String,
        response_schema: Option<Value>,
    ) -> Result<String, GenerationError> {
        let body = GeminiRequest {
            system_instruction: system.map(GeminiContent::text),
            contents: vec![GeminiContent::text(user)],
            generation_config: response_schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(GenerationError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::AuthFailed(body));
        }
        if status == 404 {
            return Err(GenerationError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api { status, message });
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| GenerationError::Api {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let text: String = api_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::Api {
                status: 0,
                message: "response contained no candidate text".to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl ExerciseGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(subject = %request.subject, hint = %request.hint))]
    async fn generate(&self, request: &ExerciseRequest) -> Result<Exercise, GenerationError> {
        let start = Instant::now();
        let system = prompt::system_instruction(request);
        let user = prompt::user_prompt(request.hint);
        let response_schema = schema::response_schema(request.subject);

        let text = self
            .generate_content(Some(system), user, Some(response_schema))
            .await?;

        let exercise = schema::decode_exercise(request.subject, request.category, text.trim())?;
        tracing::debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "exercise generated"
        );
        Ok(exercise)
    }
}

#[async_trait]
impl FeedbackSource for GeminiClient {
    #[instrument(skip(self, request), fields(correct = request.correct))]
    async fn feedback(&self, request: &FeedbackRequest) -> Result<String, GenerationError> {
        let user = prompt::feedback_prompt(request);
        let text = self.generate_content(None, user, None).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnify_core::model::{Category, DifficultyHint, Grade, MathCategory, Subject};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ExerciseRequest {
        ExerciseRequest {
            learner_name: "Noa".into(),
            grade: Grade::new(2).unwrap(),
            subject: Subject::Math,
            category: Some(Category::Math(MathCategory::Addition)),
            hint: DifficultyHint::First,
        }
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key", Some(server.uri()), None)
    }

    #[tokio::test]
    async fn generates_and_decodes_an_exercise() {
        let server = MockServer::start().await;
        let exercise_json =
            r#"{"type": "text", "question": "What is 3 + 4?", "answer": 7}"#;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(exercise_json)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let exercise = client.generate(&request()).await.unwrap();
        assert_eq!(exercise.question(), Some("What is 3 + 4?"));
    }

    #[tokio::test]
    async fn maps_rate_limits_with_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate(&request()).await.unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(7000));
    }

    #[tokio::test]
    async fn maps_auth_failures_as_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("key revoked"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate(&request()).await.unwrap_err();
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn malformed_exercise_payload_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("not an exercise")),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidExercise(_)));
        assert!(!err.is_permanent());
    }

    #[tokio::test]
    async fn feedback_returns_opaque_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body("Great job, Noa! 7 is right.\n")),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client
            .feedback(&FeedbackRequest {
                learner_name: "Noa".into(),
                grade: Grade::new(2).unwrap(),
                question: "What is 3 + 4?".into(),
                submitted: "7".into(),
                canonical: learnify_core::model::Answer::Number(7.0),
                correct: true,
            })
            .await
            .unwrap();
        assert_eq!(text, "Great job, Noa! 7 is right.");
    }
}
