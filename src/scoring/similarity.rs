use crate::types::{AlignmentResult, EditErrors, SimilarityAnalysis, Substitution};

pub const SUBSTITUTION_PENALTY: u32 = 5;
pub const INSERTION_PENALTY: u32 = 2;
pub const DELETION_PENALTY: u32 = 3;

const MAX_SUBSTITUTION_EXAMPLES: usize = 3;
const MAX_DELETION_EXAMPLES: usize = 2;
const MAX_INSERTION_EXAMPLES: usize = 2;

/// Count-based similarity score for an alignment.
///
/// The score depends only on the edit counts; WER is reported alongside but
/// does not gate it.
pub fn score_similarity(alignment: &AlignmentResult) -> SimilarityAnalysis {
    let errors = EditErrors {
        substitutions: alignment
            .substitutions()
            .map(|(from, to)| Substitution {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect(),
        insertions: alignment.insertions().map(str::to_string).collect(),
        deletions: alignment.deletions().map(str::to_string).collect(),
    };

    let substitution_penalty = SUBSTITUTION_PENALTY * errors.substitutions.len() as u32;
    let insertion_penalty = INSERTION_PENALTY * errors.insertions.len() as u32;
    let deletion_penalty = DELETION_PENALTY * errors.deletions.len() as u32;

    let raw = 100.0
        - substitution_penalty as f64
        - insertion_penalty as f64
        - deletion_penalty as f64;
    let score = round1(raw.clamp(0.0, 100.0));

    let mut summary = Vec::new();
    if alignment.wer == 0.0 {
        summary.push("Perfect match with the provided script".to_string());
    } else {
        if !errors.substitutions.is_empty() {
            summary.push(format!(
                "{} substitutions detected",
                errors.substitutions.len()
            ));
        }
        if !errors.insertions.is_empty() {
            summary.push(format!(
                "{} extra words spoken (insertions)",
                errors.insertions.len()
            ));
        }
        if !errors.deletions.is_empty() {
            summary.push(format!(
                "{} missing words (deletions)",
                errors.deletions.len()
            ));
        }
    }

    let examples = edit_examples(&errors);
    if !examples.is_empty() {
        summary.push(format!("Examples: {}", examples.join("; ")));
    }

    summary.push(format!("Substitution penalty: -{substitution_penalty}"));
    summary.push(format!("Insertion penalty: -{insertion_penalty}"));
    summary.push(format!("Deletion penalty: -{deletion_penalty}"));

    log::debug!(
        "similarity: score {} (wer {:.3}, S={} I={} D={})",
        score,
        alignment.wer,
        errors.substitutions.len(),
        errors.insertions.len(),
        errors.deletions.len()
    );

    SimilarityAnalysis {
        score,
        errors,
        summary,
    }
}

fn edit_examples(errors: &EditErrors) -> Vec<String> {
    let subs = errors
        .substitutions
        .iter()
        .take(MAX_SUBSTITUTION_EXAMPLES)
        .map(|s| format!("substituted '{}' with '{}'", s.from, s.to));
    let dels = errors
        .deletions
        .iter()
        .take(MAX_DELETION_EXAMPLES)
        .map(|w| format!("missed '{w}'"));
    let ins = errors
        .insertions
        .iter()
        .take(MAX_INSERTION_EXAMPLES)
        .map(|w| format!("added '{w}'"));
    subs.chain(dels).chain(ins).collect()
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::align::align;

    #[test]
    fn test_perfect_match() {
        let s = score_similarity(&align("Good morning, everyone.", "good morning everyone"));
        assert_eq!(s.score, 100.0);
        assert_eq!(s.summary[0], "Perfect match with the provided script");
        assert_eq!(s.summary.len(), 4);
        assert_eq!(s.summary[1], "Substitution penalty: -0");
    }

    #[test]
    fn test_two_substitutions_score_90() {
        let s = score_similarity(&align("the cat sat on the mat", "the dog sat on the rug"));
        assert_eq!(s.errors.substitutions.len(), 2);
        assert!(s.errors.insertions.is_empty());
        assert!(s.errors.deletions.is_empty());
        assert_eq!(s.score, 90.0);
        assert_eq!(s.summary[0], "2 substitutions detected");
        assert_eq!(
            s.summary[1],
            "Examples: substituted 'cat' with 'dog'; substituted 'mat' with 'rug'"
        );
        assert_eq!(s.summary[2], "Substitution penalty: -10");
    }

    #[test]
    fn test_single_insertion_and_deletion() {
        let s = score_similarity(&align("thank you for coming", "thank you so much for coming"));
        assert_eq!(s.errors.insertions, vec!["so", "much"]);
        assert_eq!(s.score, 96.0);

        let s = score_similarity(&align("thank you for coming", "thank you for really coming"));
        assert_eq!(s.score, 98.0);

        let s = score_similarity(&align("thank you for coming", "thank you coming"));
        assert_eq!(s.errors.deletions, vec!["for"]);
        assert_eq!(s.score, 97.0);
        assert!(s.summary.contains(&"Examples: missed 'for'".to_string()));
    }

    #[test]
    fn test_example_limits_and_order() {
        let s = score_similarity(&align(
            "a b c d e f g",
            "v w x y z f g extra1 extra2 extra3",
        ));
        let examples = s
            .summary
            .iter()
            .find(|l| l.starts_with("Examples: "))
            .unwrap();
        let parts: Vec<&str> = examples["Examples: ".len()..].split("; ").collect();
        assert!(parts.len() <= 7);
        assert!(parts[0].starts_with("substituted"));
        assert!(parts.iter().filter(|p| p.starts_with("substituted")).count() <= 3);
        assert!(parts.iter().filter(|p| p.starts_with("added")).count() <= 2);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let s = score_similarity(&align(
            "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty twentyone",
            "a b c d e f g h i j k l m n o p q r s t u",
        ));
        assert_eq!(s.score, 0.0);
    }
}
