//! Answer normalization and matching.
//!
//! Every learner input and every configured answer goes through the same
//! canonicalization before comparison, so "  Good   Morning " and
//! "good morning" are the same answer.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical matching form: whitespace-normalized and lower-cased.
pub fn normalize_answer(value: &str) -> String {
    normalize_text(value).to_lowercase()
}

/// Insertion-ordered set of accepted answers.
///
/// Keys are normalized answers; values keep the first-seen display casing.
/// Serialized as the list of display values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AnswerLookup {
    entries: Vec<(String, String)>,
}

impl AnswerLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lookup from configured answers, skipping blanks and duplicates.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup = Self::new();
        for value in values {
            lookup.add(value.as_ref());
        }
        lookup
    }

    /// Add an answer. Returns false when it was blank or already accepted.
    pub fn add(&mut self, value: &str) -> bool {
        let text = normalize_text(value);
        if text.is_empty() {
            return false;
        }
        let key = text.to_lowercase();
        if self.entries.iter().any(|(existing, _)| *existing == key) {
            return false;
        }
        self.entries.push((key, text));
        true
    }

    /// Whether the submitted value is an accepted answer.
    pub fn has(&self, value: &str) -> bool {
        let key = normalize_answer(value);
        self.entries.iter().any(|(existing, _)| *existing == key)
    }

    /// Display forms in insertion order.
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<String>> for AnswerLookup {
    fn from(values: Vec<String>) -> Self {
        Self::from_values(values)
    }
}

impl From<AnswerLookup> for Vec<String> {
    fn from(lookup: AnswerLookup) -> Self {
        lookup.entries.into_iter().map(|(_, text)| text).collect()
    }
}

/// Normalize a vocabulary token or gloss into a lookup key.
///
/// `æ`/`œ` are expanded, diacritics are removed, every run of non-ASCII
/// alphanumerics becomes `_` and the result is lower-cased.
pub fn normalize_token_key(value: &str) -> String {
    let expanded = value
        .replace(['æ', 'Æ'], "ae")
        .replace(['œ', 'Œ'], "oe");
    let stripped: String = expanded.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut key = String::with_capacity(stripped.len());
    let mut pending_separator = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    key
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

/// Punctuation, symbols and whitespace are trimmed from word edges; letters,
/// digits and combining vowel signs are kept.
fn is_edge_noise(c: char) -> bool {
    c.is_whitespace() || !(c.is_alphanumeric() || is_combining_mark(c))
}

/// Clean a native-script tile word.
pub fn clean_native_word(value: &str) -> String {
    let without_zero_width: String = value.chars().filter(|c| !is_zero_width(*c)).collect();
    without_zero_width
        .trim_matches(is_edge_noise)
        .to_string()
}

/// Canonical comparison form of a native-script tile word.
pub fn normalize_native_word(value: &str) -> String {
    let cleaned = clean_native_word(value);
    if cleaned.is_empty() {
        return cleaned;
    }
    let composed: String = cleaned.nfc().collect();
    normalize_text(&composed)
}

/// Clean a Latin-script tile word down to `[A-Za-z0-9']` edges.
pub fn clean_latin_word(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '\''))
        .to_string()
}

/// Canonical comparison form of a Latin-script tile word.
pub fn normalize_latin_word(value: &str) -> String {
    clean_latin_word(value).to_lowercase()
}

/// Normalize a sentence into space-separated cleaned Latin words.
pub fn normalize_sentence_text(text: &str) -> String {
    let unified = text
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2019}', "'");
    unified
        .split_whitespace()
        .map(clean_latin_word)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_answer_is_idempotent() {
        for input in [" Foo  Bar ", "foo bar", "\tMixed\nCase  ", "", "ඔයා  "] {
            let once = normalize_answer(input);
            assert_eq!(normalize_answer(&once), once);
        }
    }

    #[test]
    fn test_normalize_answer_ignores_case_and_whitespace() {
        assert_eq!(normalize_answer(" Foo  Bar "), normalize_answer("foo bar"));
        assert_eq!(normalize_text("  hello   world  "), "hello world");
    }

    #[test]
    fn test_lookup_keeps_first_casing() {
        let lookup = AnswerLookup::from_values(["Hello", "hello", "  HELLO ", "World"]);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.values(), vec!["Hello".to_string(), "World".to_string()]);
        assert!(lookup.has("hELLo"));
        assert!(lookup.has(" world "));
        assert!(!lookup.has("word"));
    }

    #[test]
    fn test_lookup_skips_blank_values() {
        let mut lookup = AnswerLookup::new();
        assert!(!lookup.add("   "));
        assert!(lookup.is_empty());
        assert!(!lookup.has(""));
    }

    #[test]
    fn test_lookup_serializes_display_values() {
        let lookup = AnswerLookup::from_values(["Good Morning", "good  morning", "hi"]);
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json, serde_json::json!(["Good Morning", "hi"]));
        let back: AnswerLookup = serde_json::from_value(json).unwrap();
        assert_eq!(back, lookup);
    }

    #[test]
    fn test_token_key() {
        assert_eq!(normalize_token_key("Sri Lanka"), "sri_lanka");
        assert_eq!(normalize_token_key("  Café!  "), "cafe");
        assert_eq!(normalize_token_key("Næ"), "nae");
        assert_eq!(normalize_token_key("__mama__"), "mama");
        assert_eq!(normalize_token_key("ආයුබෝවන්"), "");
    }

    #[test]
    fn test_native_word_keeps_vowel_signs() {
        assert_eq!(clean_native_word("ඔයා"), "ඔයා");
        assert_eq!(clean_native_word("ද?"), "ද");
        assert_eq!(clean_native_word("\u{200B}මම,"), "මම");
        assert_eq!(normalize_native_word("  හොඳයි! "), "හොඳයි");
    }

    #[test]
    fn test_latin_word_cleanup() {
        assert_eq!(clean_latin_word("\"Hello,"), "Hello");
        assert_eq!(normalize_latin_word("Don't!"), "don't");
        assert_eq!(
            normalize_sentence_text("“My name is  Kamal.”"),
            "My name is Kamal"
        );
    }
}
