use std::collections::HashSet;

use crate::types::{ProfessionalismAnalysis, ProfessionalismMetrics};

pub const BASE_SCORE: i32 = 50;
pub const FILLER_WORDS: [&str; 7] = [
    "um",
    "uh",
    "like",
    "you know",
    "basically",
    "actually",
    "literally",
];
pub const HEDGING_PHRASES: [&str; 6] = [
    "i believe",
    "i think",
    "i feel",
    "maybe",
    "perhaps",
    "might",
];

/// Lexical professionalism heuristics over a transcript.
///
/// Fillers and hedges are counted as raw substring occurrences in the
/// lowercased text, so "um" also matches inside "umbrella".
pub fn score_professionalism(text: &str) -> ProfessionalismAnalysis {
    let lower = text.to_lowercase();
    let mut score = BASE_SCORE;
    let mut analysis = Vec::new();

    let informal_words = count_occurrences(&lower, &FILLER_WORDS);
    let (delta, msg) = match informal_words {
        0 => (10, "Excellent professional language - no filler words"),
        1..=5 => (5, "Good professional language with minimal filler words"),
        6..=10 => (0, "Moderate use of filler words - could be more professional"),
        _ => (-5, "Excessive use of filler words - needs improvement"),
    };
    score += delta;
    analysis.push(msg.to_string());

    let confident_phrases = count_occurrences(&lower, &HEDGING_PHRASES);
    let (delta, msg) = match confident_phrases {
        0..=4 => (10, "Confident and assertive communication style"),
        5..=8 => (5, "Generally confident with some hedging"),
        _ => (-3, "Overuse of hedging language - be more confident"),
    };
    score += delta;
    analysis.push(msg.to_string());

    let vocabulary_richness = vocabulary_richness(&lower);
    let (delta, msg) = if vocabulary_richness >= 0.6 {
        (10, "Excellent vocabulary diversity")
    } else if vocabulary_richness >= 0.4 {
        (5, "Good vocabulary diversity")
    } else {
        (-3, "Limited vocabulary - consider expanding word choice")
    };
    score += delta;
    analysis.push(msg.to_string());

    ProfessionalismAnalysis {
        score: score.clamp(0, 100),
        analysis,
        metrics: ProfessionalismMetrics {
            informal_words,
            confident_phrases,
            vocabulary_richness,
        },
    }
}

fn count_occurrences(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| haystack.matches(n).count()).sum()
}

/// Unique whitespace tokens over total tokens; 0 for empty text.
pub fn vocabulary_richness(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = words.iter().copied().collect();
    unique.len() as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_varied_text_scores_80() {
        let p = score_professionalism(
            "Our team delivered the migration ahead of schedule with zero downtime.",
        );
        assert_eq!(p.metrics.informal_words, 0);
        assert_eq!(p.metrics.confident_phrases, 0);
        assert_eq!(p.score, 80);
        assert_eq!(p.analysis.len(), 3);
    }

    #[test]
    fn test_fillers_counted_as_substrings() {
        let p = score_professionalism("Um, I like, basically liked it");
        // "um", "like" twice, "basically"
        assert_eq!(p.metrics.informal_words, 4);
        assert_eq!(
            p.analysis[0],
            "Good professional language with minimal filler words"
        );
    }

    #[test]
    fn test_heavy_hedging_and_repetition() {
        let text = "maybe maybe maybe maybe maybe maybe maybe maybe maybe um um um um um um um um um um um";
        let p = score_professionalism(text);
        assert_eq!(p.metrics.confident_phrases, 9);
        assert_eq!(p.metrics.informal_words, 11);
        // 50 - 5 - 3 - 3
        assert_eq!(p.score, 39);
    }

    #[test]
    fn test_empty_text() {
        let p = score_professionalism("");
        assert_eq!(p.metrics.vocabulary_richness, 0.0);
        // 50 + 10 + 10 - 3
        assert_eq!(p.score, 67);
    }
}
