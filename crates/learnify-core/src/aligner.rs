//! Positional transcript-to-sentence alignment.
//!
//! Maps the finalized portion of a speech transcript onto the fixed
//! reference sentence by word index: the i-th spoken word is compared to
//! the i-th reference word after normalization. No edit-distance or
//! insertion/deletion correction — a skipped word shifts every comparison
//! after it.

use serde::{Deserialize, Serialize};

/// Status of one reference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    /// Not yet reached by the spoken prefix. Scored as not-correct.
    Pending,
    Correct,
    Incorrect,
}

/// Punctuation stripped before comparison, on both sides.
const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')', '?',
];

/// Strip punctuation, case preserved. Also used to clean words before
/// pronunciation playback.
pub fn strip_punctuation(word: &str) -> String {
    word.replace(PUNCTUATION, "")
}

/// Lowercase and strip punctuation for comparison.
fn normalize(word: &str) -> String {
    strip_punctuation(&word.to_lowercase())
}

/// Aligns a streaming transcript onto a fixed reference sentence.
///
/// Recomputation is idempotent and always runs over the full finalized
/// transcript — never an incremental diff — so a word's status cannot
/// oscillate on interim hypotheses.
#[derive(Debug, Clone)]
pub struct WordAligner {
    /// Reference words as displayed (case and punctuation preserved).
    words: Vec<String>,
    /// Normalized reference words, precomputed once.
    normalized: Vec<String>,
    statuses: Vec<WordStatus>,
}

impl WordAligner {
    /// Split the reference sentence on whitespace; all statuses start
    /// `Pending`.
    pub fn new(sentence: &str) -> Self {
        let words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        let normalized = words.iter().map(|w| normalize(w)).collect();
        let statuses = vec![WordStatus::Pending; words.len()];
        Self {
            words,
            normalized,
            statuses,
        }
    }

    /// Reference words as displayed.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn statuses(&self) -> &[WordStatus] {
        &self.statuses
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == WordStatus::Correct)
            .count()
    }

    /// Return all statuses to `Pending` (listening restarted).
    pub fn reset(&mut self) {
        self.statuses.fill(WordStatus::Pending);
    }

    /// Recompute every word status from the full finalized transcript.
    ///
    /// Returns `true` if at least one status actually changed — the signal
    /// that observers need a refresh.
    pub fn apply_transcript(&mut self, finalized: &str) -> bool {
        let spoken: Vec<String> = finalized.split_whitespace().map(normalize).collect();

        let mut changed = false;
        for (index, reference) in self.normalized.iter().enumerate() {
            let next = match spoken.get(index) {
                Some(word) if word == reference => WordStatus::Correct,
                Some(_) => WordStatus::Incorrect,
                None => WordStatus::Pending,
            };
            if self.statuses[index] != next {
                self.statuses[index] = next;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_pending() {
        let aligner = WordAligner::new("A big pig sat.");
        assert_eq!(aligner.len(), 4);
        assert!(aligner.statuses().iter().all(|s| *s == WordStatus::Pending));
    }

    #[test]
    fn positional_match_marks_correct_and_incorrect() {
        let mut aligner = WordAligner::new("The fish swims in the pond.");
        let changed = aligner.apply_transcript("the fish swam");
        assert!(changed);
        assert_eq!(
            aligner.statuses(),
            &[
                WordStatus::Correct,
                WordStatus::Correct,
                WordStatus::Incorrect,
                WordStatus::Pending,
                WordStatus::Pending,
                WordStatus::Pending,
            ]
        );
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        let mut aligner = WordAligner::new("Stop, now!");
        aligner.apply_transcript("STOP now");
        assert_eq!(aligner.statuses(), &[WordStatus::Correct, WordStatus::Correct]);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut aligner = WordAligner::new("a big pig sat");
        assert!(aligner.apply_transcript("a big dog"));
        let snapshot = aligner.statuses().to_vec();
        // Re-applying the identical transcript changes nothing.
        assert!(!aligner.apply_transcript("a big dog"));
        assert_eq!(aligner.statuses(), snapshot.as_slice());
    }

    #[test]
    fn never_correct_without_positional_equality() {
        // Skipping the first word shifts everything: nothing lines up.
        let mut aligner = WordAligner::new("a big pig sat");
        aligner.apply_transcript("big pig sat");
        assert!(aligner
            .statuses()
            .iter()
            .all(|s| *s != WordStatus::Correct));
    }

    #[test]
    fn trailing_words_stay_pending() {
        let mut aligner = WordAligner::new("one two three four");
        aligner.apply_transcript("one two");
        assert_eq!(aligner.correct_count(), 2);
        assert_eq!(aligner.statuses()[2], WordStatus::Pending);
        assert_eq!(aligner.statuses()[3], WordStatus::Pending);
    }

    #[test]
    fn empty_transcript_changes_nothing() {
        let mut aligner = WordAligner::new("one two");
        assert!(!aligner.apply_transcript(""));
        assert!(aligner.statuses().iter().all(|s| *s == WordStatus::Pending));
    }

    #[test]
    fn reset_clears_statuses() {
        let mut aligner = WordAligner::new("one two");
        aligner.apply_transcript("one two");
        aligner.reset();
        assert!(aligner.statuses().iter().all(|s| *s == WordStatus::Pending));
    }
}
