//! Core data model types for learnify.
//!
//! These are the fundamental types that the entire learnify system uses
//! to represent learners, exercises, answers, and session outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of questions in a practice session.
pub const QUESTIONS_PER_SESSION: usize = 5;

/// A subject a learner can practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    English,
    Hebrew,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Math => write!(f, "math"),
            Subject::English => write!(f, "english"),
            Subject::Hebrew => write!(f, "hebrew"),
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "math" => Ok(Subject::Math),
            "english" => Ok(Subject::English),
            "hebrew" => Ok(Subject::Hebrew),
            other => Err(format!("unknown subject: {other}")),
        }
    }
}

/// School grade, 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub fn new(grade: u8) -> Result<Self, String> {
        if (1..=6).contains(&grade) {
            Ok(Grade(grade))
        } else {
            Err(format!("grade must be between 1 and 6, got {grade}"))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s.parse().map_err(|_| format!("invalid grade: {s}"))?;
        Grade::new(n)
    }
}

/// A learner profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// School grade (drives exercise difficulty and vocabulary).
    pub grade: Grade,
}

impl Learner {
    pub fn new(name: impl Into<String>, grade: Grade) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            grade,
        }
    }
}

/// Math practice categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathCategory {
    Counting,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
}

impl fmt::Display for MathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MathCategory::Counting => "counting",
            MathCategory::Addition => "addition",
            MathCategory::Subtraction => "subtraction",
            MathCategory::Multiplication => "multiplication",
            MathCategory::Division => "division",
            MathCategory::Fractions => "fractions",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MathCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "counting" => Ok(MathCategory::Counting),
            "addition" => Ok(MathCategory::Addition),
            "subtraction" => Ok(MathCategory::Subtraction),
            "multiplication" => Ok(MathCategory::Multiplication),
            "division" => Ok(MathCategory::Division),
            "fractions" => Ok(MathCategory::Fractions),
            other => Err(format!("unknown math category: {other}")),
        }
    }
}

/// English practice categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnglishCategory {
    ReadingPractice,
    Vocabulary,
    Comprehension,
}

impl fmt::Display for EnglishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnglishCategory::ReadingPractice => "reading_practice",
            EnglishCategory::Vocabulary => "vocabulary",
            EnglishCategory::Comprehension => "comprehension",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EnglishCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading_practice" | "reading" => Ok(EnglishCategory::ReadingPractice),
            "vocabulary" => Ok(EnglishCategory::Vocabulary),
            "comprehension" => Ok(EnglishCategory::Comprehension),
            other => Err(format!("unknown english category: {other}")),
        }
    }
}

/// A practice category within a subject. Hebrew sessions carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Math(MathCategory),
    English(EnglishCategory),
}

impl Category {
    /// Parse a category string in the context of a subject.
    pub fn parse_for(subject: Subject, s: &str) -> Result<Self, String> {
        match subject {
            Subject::Math => s.parse().map(Category::Math),
            Subject::English => s.parse().map(Category::English),
            Subject::Hebrew => Err("hebrew sessions have no category".to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Math(c) => c.fmt(f),
            Category::English(c) => c.fmt(f),
        }
    }
}

/// Adaptivity signal sent to the generation collaborator, derived from the
/// previous question's outcome. The sole difficulty input — no explicit
/// difficulty level is stored anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyHint {
    /// First question of the session.
    First,
    /// Previous question answered correctly.
    Correct,
    /// Previous question answered incorrectly.
    Incorrect,
}

impl fmt::Display for DifficultyHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyHint::First => write!(f, "first"),
            DifficultyHint::Correct => write!(f, "correct"),
            DifficultyHint::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// One element of a visual math exercise (e.g. 🍎 × 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualElement {
    pub emoji: String,
    pub count: u32,
}

/// Emoji visualization for early-grade math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub elements: Vec<VisualElement>,
    /// Display operation, e.g. "+", "-", "×", "÷".
    pub operation: String,
}

/// A generated exercise. One exercise is live per question; immutable once
/// received from the generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exercise {
    /// Emoji-illustrated math for grades 1-2.
    VisualMath {
        question: String,
        visualization: Visualization,
        answer: f64,
    },
    /// Plain math question, optionally multiple-choice.
    TextMath {
        question: String,
        #[serde(default)]
        options: Option<Vec<String>>,
        answer: f64,
    },
    /// A sentence to read aloud. Correctness is derived from transcript
    /// alignment, never from answer equality.
    ReadingPractice { sentence: String },
    /// Which-sentence-uses-this-word-correctly quiz.
    Vocabulary {
        word: String,
        definition: String,
        question: String,
        options: Vec<String>,
        answer: String,
    },
    /// Passage plus a question about it.
    Comprehension {
        passage: String,
        question: String,
        options: Vec<String>,
        answer: String,
    },
    /// Hebrew multiple-choice question.
    HebrewText {
        question: String,
        options: Vec<String>,
        answer: String,
    },
}

impl Exercise {
    /// The question text, if this exercise has one.
    pub fn question(&self) -> Option<&str> {
        match self {
            Exercise::VisualMath { question, .. }
            | Exercise::TextMath { question, .. }
            | Exercise::Vocabulary { question, .. }
            | Exercise::Comprehension { question, .. }
            | Exercise::HebrewText { question, .. } => Some(question),
            Exercise::ReadingPractice { .. } => None,
        }
    }

    /// Multiple-choice options, if any.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Exercise::TextMath { options, .. } => options.as_deref(),
            Exercise::Vocabulary { options, .. }
            | Exercise::Comprehension { options, .. }
            | Exercise::HebrewText { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The canonical answer, if this exercise is quiz-style.
    pub fn canonical_answer(&self) -> Option<Answer> {
        match self {
            Exercise::VisualMath { answer, .. } | Exercise::TextMath { answer, .. } => {
                Some(Answer::Number(*answer))
            }
            Exercise::Vocabulary { answer, .. }
            | Exercise::Comprehension { answer, .. }
            | Exercise::HebrewText { answer, .. } => Some(Answer::Text(answer.clone())),
            Exercise::ReadingPractice { .. } => None,
        }
    }

    /// A longer text to show above the question (comprehension passages).
    pub fn passage(&self) -> Option<&str> {
        match self {
            Exercise::Comprehension { passage, .. } => Some(passage),
            _ => None,
        }
    }

    pub fn is_reading(&self) -> bool {
        matches!(self, Exercise::ReadingPractice { .. })
    }
}

/// A canonical answer: the generation collaborator produces numbers for
/// math and strings for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral answers render without a decimal point so "7"
            // compares equal to 7.0.
            Answer::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            Answer::Number(n) => write!(f, "{n}"),
            Answer::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The evaluator's verdict plus the collaborator's encouragement text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub correct: bool,
    /// Opaque text from the feedback collaborator.
    pub text: String,
}

/// How a completed session went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionOutcome {
    Quiz { correct: u32, incorrect: u32 },
    Reading { avg_wpm: u32, avg_accuracy: u32 },
}

/// Emitted exactly once when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub subject: Subject,
    #[serde(default)]
    pub category: Option<Category>,
    pub outcome: SessionOutcome,
}

/// Cumulative per-subject completion percentage for one learner.
/// Values stay in [0, 100] and never decrease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub math: f64,
    #[serde(default)]
    pub english: f64,
    #[serde(default)]
    pub hebrew: f64,
}

impl Progress {
    pub fn get(&self, subject: Subject) -> f64 {
        match subject {
            Subject::Math => self.math,
            Subject::English => self.english,
            Subject::Hebrew => self.hebrew,
        }
    }

    pub fn set(&mut self, subject: Subject, value: f64) {
        let slot = match subject {
            Subject::Math => &mut self.math,
            Subject::English => &mut self.english,
            Subject::Hebrew => &mut self.hebrew,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_display_and_parse() {
        assert_eq!(Subject::Math.to_string(), "math");
        assert_eq!("english".parse::<Subject>().unwrap(), Subject::English);
        assert_eq!("Hebrew".parse::<Subject>().unwrap(), Subject::Hebrew);
        assert!("science".parse::<Subject>().is_err());
    }

    #[test]
    fn grade_bounds() {
        assert!(Grade::new(1).is_ok());
        assert!(Grade::new(6).is_ok());
        assert!(Grade::new(0).is_err());
        assert!(Grade::new(7).is_err());
        assert_eq!("3".parse::<Grade>().unwrap().value(), 3);
    }

    #[test]
    fn category_parse_for_subject() {
        assert_eq!(
            Category::parse_for(Subject::Math, "addition").unwrap(),
            Category::Math(MathCategory::Addition)
        );
        assert_eq!(
            Category::parse_for(Subject::English, "reading_practice").unwrap(),
            Category::English(EnglishCategory::ReadingPractice)
        );
        assert!(Category::parse_for(Subject::Hebrew, "anything").is_err());
        assert!(Category::parse_for(Subject::Math, "vocabulary").is_err());
    }

    #[test]
    fn answer_display_drops_trailing_zero() {
        assert_eq!(Answer::Number(7.0).to_string(), "7");
        assert_eq!(Answer::Number(3.5).to_string(), "3.5");
        assert_eq!(Answer::Text("seven".into()).to_string(), "seven");
    }

    #[test]
    fn exercise_accessors() {
        let reading = Exercise::ReadingPractice {
            sentence: "A big pig sat.".into(),
        };
        assert!(reading.is_reading());
        assert!(reading.question().is_none());
        assert!(reading.canonical_answer().is_none());

        let math = Exercise::TextMath {
            question: "What is 3 + 4?".into(),
            options: None,
            answer: 7.0,
        };
        assert_eq!(math.question(), Some("What is 3 + 4?"));
        assert_eq!(math.canonical_answer(), Some(Answer::Number(7.0)));
        assert!(!math.is_reading());
    }

    #[test]
    fn progress_get_set() {
        let mut p = Progress::default();
        assert_eq!(p.get(Subject::Math), 0.0);
        p.set(Subject::Math, 52.0);
        assert_eq!(p.get(Subject::Math), 52.0);
        assert_eq!(p.get(Subject::English), 0.0);
    }

    #[test]
    fn session_summary_serde_roundtrip() {
        let summary = SessionSummary {
            subject: Subject::English,
            category: Some(Category::English(EnglishCategory::ReadingPractice)),
            outcome: SessionOutcome::Reading {
                avg_wpm: 42,
                avg_accuracy: 90,
            },
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: SessionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
