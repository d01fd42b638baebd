//! Reading speed and accuracy scoring.
//!
//! Works from elapsed listening time and the frozen word statuses; the
//! session controller accumulates per-sentence scores and averages them at
//! session end.

use serde::{Deserialize, Serialize};

use crate::aligner::WordStatus;

/// Score for one read sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceScore {
    /// Correctly read words per minute, rounded.
    pub wpm: u32,
    /// Percentage of reference words read correctly, rounded.
    pub accuracy: u32,
}

/// Session-level averages over all read sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingAverages {
    pub wpm: u32,
    pub accuracy: u32,
}

/// Score a single sentence from its listening window and final statuses.
///
/// Pending words count as not-correct. A zero or negative elapsed window
/// yields wpm 0; an empty reference yields accuracy 0.
pub fn score_sentence(started_ms: u64, stopped_ms: u64, statuses: &[WordStatus]) -> SentenceScore {
    let elapsed_minutes = stopped_ms.saturating_sub(started_ms) as f64 / 60_000.0;
    let correct = statuses
        .iter()
        .filter(|s| **s == WordStatus::Correct)
        .count() as f64;
    let total = statuses.len() as f64;

    let wpm = if elapsed_minutes > 0.0 {
        (correct / elapsed_minutes).round() as u32
    } else {
        0
    };
    let accuracy = if total > 0.0 {
        (correct / total * 100.0).round() as u32
    } else {
        0
    };

    SentenceScore { wpm, accuracy }
}

/// Arithmetic mean of per-sentence scores, rounded; zeros for an empty
/// session.
pub fn session_average(scores: &[SentenceScore]) -> ReadingAverages {
    if scores.is_empty() {
        return ReadingAverages { wpm: 0, accuracy: 0 };
    }
    let n = scores.len() as f64;
    let wpm_sum: u64 = scores.iter().map(|s| s.wpm as u64).sum();
    let accuracy_sum: u64 = scores.iter().map(|s| s.accuracy as u64).sum();
    ReadingAverages {
        wpm: (wpm_sum as f64 / n).round() as u32,
        accuracy: (accuracy_sum as f64 / n).round() as u32,
    }
}
