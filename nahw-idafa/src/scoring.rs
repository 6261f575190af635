//! Answer validation by set similarity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::construction::DetectionResult;

pub const CORRECT_THRESHOLD: f64 = 0.8;
pub const PARTIAL_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerScore {
    pub is_correct: bool,
    pub is_partial: bool,
    /// Best similarity as a percentage.
    pub score: u32,
}

/// Jaccard similarity; two empty sets score 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Score a selection against every acceptable answer, keeping the best match.
pub fn score(correct: &[HashSet<String>], user: &HashSet<String>) -> AnswerScore {
    let best = correct
        .iter()
        .map(|answer| jaccard(answer, user))
        .fold(0.0_f64, f64::max);

    AnswerScore {
        is_correct: best >= CORRECT_THRESHOLD,
        is_partial: (PARTIAL_THRESHOLD..CORRECT_THRESHOLD).contains(&best),
        score: (best * 100.0).round() as u32,
    }
}

/// One acceptable answer per detected construction.
pub fn answer_sets(result: &DetectionResult) -> Vec<HashSet<String>> {
    result
        .constructions
        .iter()
        .map(|construction| construction.word_ids())
        .collect()
}
