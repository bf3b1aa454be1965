// file: src/retrieval/tokenizer.rs
// description: text normalization into lexical index terms
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

/// Terms of this many characters or fewer are dropped.
pub const MIN_TERM_EXCLUSIVE_LEN: usize = 2;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("NON_WORD regex is valid");
}

/// Lower-cases, strips punctuation, splits on whitespace and drops short
/// terms. Shared by indexing and querying.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");

    cleaned
        .split_whitespace()
        .filter(|term| term.chars().count() > MIN_TERM_EXCLUSIVE_LEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! The QUICK fox."),
            vec!["hello", "world", "the", "quick", "fox"]
        );
    }

    #[test]
    fn test_drops_terms_of_two_chars_or_less() {
        assert_eq!(tokenize("a an the of cat"), vec!["the", "cat"]);
    }

    #[test]
    fn test_punctuation_inside_word_is_removed_not_split() {
        assert_eq!(tokenize("tf-idf l'article"), vec!["tfidf", "larticle"]);
    }

    #[test]
    fn test_keeps_accented_letters_and_underscores() {
        assert_eq!(tokenize("Décision snake_case"), vec!["décision", "snake_case"]);
    }

    #[test]
    fn test_whitespace_runs_and_empty_input() {
        assert_eq!(tokenize("  \n\t  "), Vec::<String>::new());
        assert_eq!(tokenize("one\t\ttwo  three"), vec!["one", "two", "three"]);
    }
}
