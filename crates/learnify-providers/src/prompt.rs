//! Prompt construction for the generation and feedback collaborators.
//!
//! The system instruction carries the learner profile and subject focus;
//! the user prompt carries only the adaptivity signal.

use learnify_core::model::{Category, DifficultyHint, Subject};
use learnify_core::traits::{ExerciseRequest, FeedbackRequest};

/// Subject focus line for the system instruction. Hebrew has no category
/// and always practices reading and basic vocabulary.
fn focus(subject: Subject, category: Option<Category>) -> String {
    match (subject, category) {
        (Subject::Hebrew, _) => "reading and basic vocabulary".to_string(),
        (_, Some(category)) => category.to_string(),
        (_, None) => "general practice".to_string(),
    }
}

/// Build the system instruction for an exercise request.
pub fn system_instruction(request: &ExerciseRequest) -> String {
    let mut instruction = format!(
        "You are a fun and encouraging AI tutor for a grade {grade} student named {name}. \
         Your goal is to create an educational exercise that is engaging and appropriate \
         for their age. The subject is {subject}, focusing on {focus}. The response must \
         be a JSON object that strictly follows the schema provided. Do not include any \
         markdown formatting like ```json or any introductory text.",
        grade = request.grade,
        name = request.learner_name,
        subject = request.subject,
        focus = focus(request.subject, request.category),
    );

    if request.subject == Subject::English
        && matches!(
            request.category,
            Some(Category::English(
                learnify_core::model::EnglishCategory::ReadingPractice
            ))
        )
    {
        instruction.push_str(READING_RULES);
    }

    instruction
}

/// Phonics constraints for generated reading sentences, keyed to the
/// learner's grade by the instruction above.
const READING_RULES: &str = "\n\nYou are also an expert in early childhood reading education, \
specializing in phonics-based methodology. The sentence you generate for reading practice \
MUST adhere to the following principles:\n\
- Phonetic Focus: Use primarily phonetically regular, decodable words.\n\
- CVC Words: For early grades (1-2), heavily favor CVC (consonant-vowel-consonant) words \
(e.g., cat, sun, pin).\n\
- Repetition: Use repetition of words and sounds to build confidence.\n\
- Simple Structure: The sentence must be grammatically simple and very short.\n\
- Real Words Only: Every word must be a valid, correctly-spelled English word. Do not \
invent words.\n\
- Gradual Complexity based on grade:\n\
  - Grade 1: Strictly CVC words and a few basic sight words (e.g., a, the, is, on, see, I). \
Example: \"A big pig sat.\"\n\
  - Grade 2: Introduce consonant blends (e.g., stop, frog), digraphs (e.g., fish, chat), \
and more common sight words. Example: \"The fish swims in the pond.\"\n\
  - Grades 3+: Sentences can be slightly longer and include multi-syllable but still \
decodable words. The focus remains on pronunciation practice, not complex narrative. \
Example: \"The children started to finish their project.\"";

/// Build the user prompt for an exercise request from the difficulty hint.
pub fn user_prompt(hint: DifficultyHint) -> String {
    let mut prompt = String::from("Generate a new exercise.");
    match hint {
        DifficultyHint::Correct => prompt.push_str(
            " The student just answered the previous question correctly, so make this one \
             a little more challenging, but still within their grade level and adhering to \
             all system instructions.",
        ),
        DifficultyHint::Incorrect => prompt.push_str(
            " The student struggled with the last question, so generate a slightly easier \
             one to help them build confidence.",
        ),
        DifficultyHint::First => prompt.push_str(" This is the first question of the session."),
    }
    prompt
}

/// Build the feedback prompt for a resolved question. The verdict is
/// already computed and is passed in, never re-derived.
pub fn feedback_prompt(request: &FeedbackRequest) -> String {
    format!(
        "A grade {grade} student named {name} answered a question.\n\
         Question: \"{question}\"\n\
         Their answer: \"{submitted}\"\n\
         Correct answer: \"{canonical}\"\n\
         The student was {verdict}.\n\
         Provide a short, positive, and encouraging feedback message for them. If they \
         were incorrect, gently explain the correct answer without being discouraging. \
         Keep it to one or two sentences.",
        grade = request.grade,
        name = request.learner_name,
        question = request.question,
        submitted = request.submitted,
        canonical = request.canonical,
        verdict = if request.correct { "correct" } else { "incorrect" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnify_core::model::{Answer, EnglishCategory, Grade, MathCategory};

    fn request(subject: Subject, category: Option<Category>, hint: DifficultyHint) -> ExerciseRequest {
        ExerciseRequest {
            learner_name: "Noa".into(),
            grade: Grade::new(2).unwrap(),
            subject,
            category,
            hint,
        }
    }

    #[test]
    fn system_instruction_carries_profile_and_focus() {
        let instruction = system_instruction(&request(
            Subject::Math,
            Some(Category::Math(MathCategory::Addition)),
            DifficultyHint::First,
        ));
        assert!(instruction.contains("grade 2"));
        assert!(instruction.contains("Noa"));
        assert!(instruction.contains("math"));
        assert!(instruction.contains("addition"));
        assert!(!instruction.contains("CVC"));
    }

    #[test]
    fn reading_practice_adds_phonics_rules() {
        let instruction = system_instruction(&request(
            Subject::English,
            Some(Category::English(EnglishCategory::ReadingPractice)),
            DifficultyHint::First,
        ));
        assert!(instruction.contains("CVC"));
        assert!(instruction.contains("reading_practice"));
    }

    #[test]
    fn hebrew_focus_is_fixed() {
        let instruction = system_instruction(&request(Subject::Hebrew, None, DifficultyHint::First));
        assert!(instruction.contains("reading and basic vocabulary"));
    }

    #[test]
    fn user_prompt_tracks_hint() {
        assert!(user_prompt(DifficultyHint::First).contains("first question"));
        assert!(user_prompt(DifficultyHint::Correct).contains("more challenging"));
        assert!(user_prompt(DifficultyHint::Incorrect).contains("easier"));
    }

    #[test]
    fn feedback_prompt_states_verdict() {
        let prompt = feedback_prompt(&FeedbackRequest {
            learner_name: "Noa".into(),
            grade: Grade::new(2).unwrap(),
            question: "What is 3 + 4?".into(),
            submitted: "8".into(),
            canonical: Answer::Number(7.0),
            correct: false,
        });
        assert!(prompt.contains("was incorrect"));
        assert!(prompt.contains("\"7\""));
    }
}
