//! Word tokenizer shared by the scoring functions

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// A tag opens with a letter, `/` or `!`; a bare `<` in prose is not markup
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)</?[A-Za-z!][^<>]*>").expect("tag pattern is valid")
});
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Split raw text into word tokens in reading order.
///
/// Markup is removed, the text is NFC-normalized (so a decomposed `é` matches the
/// precomposed form used by rank tables), and every maximal run of Unicode word
/// characters becomes one token. Case is preserved. Empty or punctuation-only text
/// yields no tokens.
pub fn split_words(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let stripped = TAG_RE.replace_all(text, " ");
    let normalized: String = stripped.nfc().collect();
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Decode a term taken from a URL path segment (`+` stands for a space)
pub fn decode_word(term: &str) -> String {
    term.replace('+', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentence() {
        assert_eq!(split_words("el sol brilla"), vec!["el", "sol", "brilla"]);
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(
            split_words("¡Hola, mundo! ¿Qué tal?"),
            vec!["Hola", "mundo", "Qué", "tal"]
        );
        assert_eq!(split_words("l'homme"), vec!["l", "homme"]);
    }

    #[test]
    fn test_markup_is_stripped() {
        assert_eq!(
            split_words("<p>Der <b>Hund</b> bellt</p>"),
            vec!["Der", "Hund", "bellt"]
        );
        assert_eq!(split_words("a<!-- nota -->b"), vec!["a", "b"]);
    }

    #[test]
    fn test_comparison_signs_are_not_markup() {
        assert_eq!(split_words("x < y y z > w"), vec!["x", "y", "y", "z", "w"]);
        assert_eq!(split_words("3 <5 y 7> 2"), vec!["3", "5", "y", "7", "2"]);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(split_words("").is_empty());
        assert!(split_words(" ... !? ").is_empty());
    }

    #[test]
    fn test_nfc_normalization() {
        // "e" + combining acute accent
        let decomposed = "caf\u{0065}\u{0301}";
        assert_eq!(split_words(decomposed), vec!["caf\u{00e9}"]);
    }

    #[test]
    fn test_decode_word() {
        assert_eq!(decode_word("ice+cream"), "ice cream");
        assert_eq!(decode_word("Haus"), "Haus");
    }
}
