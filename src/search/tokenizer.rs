/// Split a raw query into lower-cased, whitespace-delimited tokens.
///
/// Empty and whitespace-only queries produce no tokens. Punctuation is kept:
/// "i7-8550u" stays a single token so it can still match a title verbatim.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// True when the query carries no searchable text.
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_query_lowercases_and_splits() {
        assert_eq!(tokenize_query("Red  BIKE\tBerlin"), vec!["red", "bike", "berlin"]);
    }

    #[test]
    fn test_tokenize_query_blank() {
        assert!(tokenize_query("").is_empty());
        assert!(tokenize_query("   \n\t ").is_empty());
        assert!(is_blank_query(" \t"));
        assert!(!is_blank_query(" a "));
    }

    #[test]
    fn test_tokenize_query_keeps_short_words_and_punctuation() {
        assert_eq!(tokenize_query("tv i7-8550u"), vec!["tv", "i7-8550u"]);
    }
}
