/// Lowercase, strip ASCII punctuation and split on whitespace.
///
/// Punctuation is removed rather than treated as a separator, so "don't"
/// becomes the single token "dont".
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! Don't stop."),
            vec!["hello", "world", "dont", "stop"]
        );
    }

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        assert!(tokenize("  ... ,, !  ").is_empty());
        assert_eq!(tokenize("a  -  b"), vec!["a", "b"]);
    }
}
