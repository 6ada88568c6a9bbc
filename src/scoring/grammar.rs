use crate::types::{GrammarAnalysis, GrammarFinding};

/// `(maximum error count, deduction, message)`, checked top to bottom.
pub const ERROR_BANDS: [(usize, i32, &str); 4] = [
    (0, 0, "Excellent grammar - no errors detected"),
    (3, 6, "Good grammar with minor errors"),
    (6, 12, "Moderate grammar issues"),
    (12, 24, "Significant grammar problems"),
];
pub const ERROR_FLOOR: (i32, &str) = (40, "Major grammar issues need attention");

/// Average sentence length (words) considered well structured.
pub const SENTENCE_LENGTH_RANGE: (f64, f64) = (8.0, 25.0);

/// Score a transcript from the grammar checker's findings and its sentence
/// structure.
pub fn score_grammar(text: &str, findings: &[GrammarFinding]) -> GrammarAnalysis {
    let error_count = findings.len();
    let (deduction, message) = ERROR_BANDS
        .iter()
        .find(|(max, _, _)| error_count <= *max)
        .map(|&(_, d, m)| (d, m))
        .unwrap_or(ERROR_FLOOR);

    let mut analysis = vec![message.to_string()];

    let avg = average_sentence_length(text);
    let (lo, hi) = SENTENCE_LENGTH_RANGE;
    if (lo..=hi).contains(&avg) {
        analysis.push("Good sentence structure and variety".to_string());
    } else if avg < lo {
        analysis.push("Sentences are too short - consider combining ideas".to_string());
    } else {
        analysis.push("Sentences are quite long - consider breaking them up".to_string());
    }

    if let Some(rule) = most_common_rule(findings) {
        analysis.push(format!("Most common error: {rule}"));
    }

    GrammarAnalysis {
        score: 100 - deduction,
        analysis,
        errors: findings.iter().map(|f| f.message.clone()).collect(),
        error_count,
    }
}

/// Split on sentence terminators; a word is any whitespace token containing
/// an alphanumeric character.
pub fn average_sentence_length(text: &str) -> f64 {
    let lengths: Vec<usize> = text
        .split(['.', '!', '?'])
        .map(|s| {
            s.split_whitespace()
                .filter(|w| w.chars().any(char::is_alphanumeric))
                .count()
        })
        .filter(|&n| n > 0)
        .collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

/// Most frequent rule id; the first one seen wins a tie.
fn most_common_rule(findings: &[GrammarFinding]) -> Option<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for f in findings {
        match counts.iter_mut().find(|(id, _)| *id == f.rule_id) {
            Some((_, n)) => *n += 1,
            None => counts.push((f.rule_id.as_str(), 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (id, n) in counts {
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((id, n));
        }
    }
    best.map(|(id, _)| id)
}
