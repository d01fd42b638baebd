//! Per-subject exercise schemas and payload validation.
//!
//! The generation collaborator is asked for JSON constrained by a fixed
//! response schema per subject; whatever comes back is still re-validated
//! here before it becomes an `Exercise`. Anything mis-shaped fails the
//! request as `GenerationError::InvalidExercise`.

use serde::Deserialize;
use serde_json::{json, Value};

use learnify_core::error::GenerationError;
use learnify_core::model::{
    Category, EnglishCategory, Exercise, Subject, VisualElement, Visualization,
};

/// The response schema sent with a generation request for this subject.
pub fn response_schema(subject: Subject) -> Value {
    match subject {
        Subject::Math => json!({
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "description": "Either \"visual\" for grades 1-2 or \"text\" for grades 3-6." },
                "question": { "type": "STRING" },
                "answer": { "type": "NUMBER" },
                "visualization": {
                    "type": "OBJECT",
                    "description": "Required if type is \"visual\", otherwise omit. Use simple, common emojis.",
                    "properties": {
                        "elements": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "emoji": { "type": "STRING" },
                                    "count": { "type": "NUMBER" }
                                },
                                "required": ["emoji", "count"]
                            }
                        },
                        "operation": { "type": "STRING", "description": "e.g. \"+\", \"-\", \"×\", \"÷\"" }
                    },
                    "required": ["elements", "operation"]
                }
            },
            "required": ["type", "question", "answer"]
        }),
        Subject::English => json!({
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "description": "One of: \"reading_practice\", \"vocabulary\", \"comprehension\"." },
                "sentence": { "type": "STRING", "description": "A single, grade-appropriate sentence to read aloud. Required for type 'reading_practice'." },
                "passage": { "type": "STRING", "description": "A short passage. Required for type 'comprehension'." },
                "word": { "type": "STRING", "description": "The vocabulary word." },
                "definition": { "type": "STRING", "description": "A simple definition for the vocabulary word." },
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "answer": { "type": "STRING" }
            },
            "required": ["type"]
        }),
        Subject::Hebrew => json!({
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "description": "Always \"text\" for Hebrew." },
                "question": { "type": "STRING", "description": "Question in Hebrew, with vowels (nikkud) for clarity." },
                "options": { "type": "ARRAY", "items": { "type": "STRING", "description": "Options in Hebrew with vowels." } },
                "answer": { "type": "STRING", "description": "The correct answer in Hebrew." }
            },
            "required": ["type", "question", "answer"]
        }),
    }
}

// Intermediate wire structures, validated into the domain model.

#[derive(Debug, Deserialize)]
struct MathPayload {
    #[serde(rename = "type")]
    kind: String,
    question: String,
    answer: f64,
    #[serde(default)]
    visualization: Option<VisualizationPayload>,
    #[serde(default)]
    options: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct VisualizationPayload {
    elements: Vec<VisualElementPayload>,
    operation: String,
}

#[derive(Debug, Deserialize)]
struct VisualElementPayload {
    emoji: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct EnglishPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    sentence: Option<String>,
    #[serde(default)]
    passage: Option<String>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HebrewPayload {
    #[serde(rename = "type")]
    kind: String,
    question: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    answer: String,
}

fn invalid(message: impl Into<String>) -> GenerationError {
    GenerationError::InvalidExercise(message.into())
}

/// Options may arrive as strings or numbers; render both as display
/// strings.
fn stringify_options(options: Vec<Value>) -> Result<Vec<String>, GenerationError> {
    options
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(invalid(format!("unsupported option value: {other}"))),
        })
        .collect()
}

/// Parse and validate a generation payload for the given subject.
pub fn decode_exercise(
    subject: Subject,
    category: Option<Category>,
    payload: &str,
) -> Result<Exercise, GenerationError> {
    match subject {
        Subject::Math => decode_math(payload),
        Subject::English => decode_english(category, payload),
        Subject::Hebrew => decode_hebrew(payload),
    }
}

fn decode_math(payload: &str) -> Result<Exercise, GenerationError> {
    let parsed: MathPayload =
        serde_json::from_str(payload).map_err(|e| invalid(format!("math payload: {e}")))?;
    match parsed.kind.as_str() {
        "visual" => {
            let viz = parsed
                .visualization
                .ok_or_else(|| invalid("visual math exercise is missing its visualization"))?;
            Ok(Exercise::VisualMath {
                question: parsed.question,
                visualization: Visualization {
                    elements: viz
                        .elements
                        .into_iter()
                        .map(|e| VisualElement {
                            emoji: e.emoji,
                            count: e.count,
                        })
                        .collect(),
                    operation: viz.operation,
                },
                answer: parsed.answer,
            })
        }
        "text" => Ok(Exercise::TextMath {
            question: parsed.question,
            options: parsed.options.map(stringify_options).transpose()?,
            answer: parsed.answer,
        }),
        other => Err(invalid(format!("unknown math exercise type: {other}"))),
    }
}

fn decode_english(
    category: Option<Category>,
    payload: &str,
) -> Result<Exercise, GenerationError> {
    let parsed: EnglishPayload =
        serde_json::from_str(payload).map_err(|e| invalid(format!("english payload: {e}")))?;

    // A reading-practice request must come back as a reading sentence;
    // anything else cannot be aligned.
    let want_reading = matches!(
        category,
        Some(Category::English(EnglishCategory::ReadingPractice))
    );
    if want_reading && parsed.kind != "reading_practice" {
        return Err(invalid(format!(
            "requested reading practice but got type: {}",
            parsed.kind
        )));
    }

    match parsed.kind.as_str() {
        "reading_practice" => {
            let sentence = parsed
                .sentence
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| invalid("reading exercise is missing its sentence"))?;
            Ok(Exercise::ReadingPractice { sentence })
        }
        "vocabulary" => Ok(Exercise::Vocabulary {
            word: parsed
                .word
                .ok_or_else(|| invalid("vocabulary exercise is missing its word"))?,
            definition: parsed
                .definition
                .ok_or_else(|| invalid("vocabulary exercise is missing its definition"))?,
            question: parsed
                .question
                .ok_or_else(|| invalid("vocabulary exercise is missing its question"))?,
            options: parsed
                .options
                .filter(|o| !o.is_empty())
                .ok_or_else(|| invalid("vocabulary exercise is missing its options"))?,
            answer: parsed
                .answer
                .ok_or_else(|| invalid("vocabulary exercise is missing its answer"))?,
        }),
        "comprehension" => Ok(Exercise::Comprehension {
            passage: parsed
                .passage
                .ok_or_else(|| invalid("comprehension exercise is missing its passage"))?,
            question: parsed
                .question
                .ok_or_else(|| invalid("comprehension exercise is missing its question"))?,
            options: parsed
                .options
                .filter(|o| !o.is_empty())
                .ok_or_else(|| invalid("comprehension exercise is missing its options"))?,
            answer: parsed
                .answer
                .ok_or_else(|| invalid("comprehension exercise is missing its answer"))?,
        }),
        other => Err(invalid(format!("unknown english exercise type: {other}"))),
    }
}

fn decode_hebrew(payload: &str) -> Result<Exercise, GenerationError> {
    let parsed: HebrewPayload =
        serde_json::from_str(payload).map_err(|e| invalid(format!("hebrew payload: {e}")))?;
    if parsed.kind != "text" {
        return Err(invalid(format!(
            "unknown hebrew exercise type: {}",
            parsed.kind
        )));
    }
    Ok(Exercise::HebrewText {
        question: parsed.question,
        options: parsed.options.unwrap_or_default(),
        answer: parsed.answer,
    })
}
