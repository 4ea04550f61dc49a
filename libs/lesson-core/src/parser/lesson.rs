//! Vocabulary extraction from lesson markdown sources.
//!
//! A lesson file carries a `vocab:` block of inline objects:
//! ```text
//! vocab:
//!   - { si: "මම", en: "I", translit: "mama" }
//!   - { si: "ඔයා",
//!       en: "you" }
//! exercises:
//! ```
//! Entries may continue over several lines. The block ends at the next
//! top-level `key:` line.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use super::indent_of;
use crate::error::ParseError;
use crate::normalize::normalize_text;
use crate::types::VocabEntry;

/// Keys and values of a `{ key: value, ... }` literal.
pub type InlineObject = HashMap<String, String>;

static VOCAB_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*vocab\s*:").expect("valid regex"));
static BLOCK_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+\s*:").expect("valid regex"));
static INLINE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)\s*:\s*(?:"([^"]*)"|'([^']*)'|([^,}]+))"#).expect("valid regex")
});

/// Parse the body of an inline object. Quoted values may contain commas.
pub fn parse_inline_object(text: &str, line: usize) -> Result<InlineObject, ParseError> {
    let trimmed = text.trim();
    let content = trimmed
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(trimmed);
    let flattened = content.lines().map(str::trim).collect::<Vec<_>>().join(" ");

    let mut object = InlineObject::new();
    for caps in INLINE_PAIR.captures_iter(&flattened) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        object.insert(caps[1].to_string(), normalize_text(value));
    }

    if object.is_empty() {
        return Err(ParseError::InvalidPair {
            line,
            value: trimmed.to_string(),
        });
    }
    Ok(object)
}

/// Build a vocabulary entry from an inline object. Both `si` and `en` must be present.
pub fn vocab_from_object(object: &InlineObject) -> Option<VocabEntry> {
    let field = |key: &str| object.get(key).map(String::as_str).unwrap_or_default();
    let transliteration = object
        .get("translit")
        .or_else(|| object.get("transliteration"))
        .map(String::as_str);
    let mut entry = VocabEntry::new(field("si"), field("en"), transliteration)?;
    entry.priority = matches!(field("priority").to_lowercase().as_str(), "true" | "yes");
    entry.word_bank_base = object
        .get("wordBankSi")
        .filter(|value| !value.is_empty())
        .cloned();
    entry.word_bank_target = object
        .get("wordBankEn")
        .filter(|value| !value.is_empty())
        .cloned();
    Some(entry)
}

/// Extract the `vocab:` block entries from a lesson source.
pub fn extract_vocab_entries(markdown: &str) -> Vec<VocabEntry> {
    let lines: Vec<&str> = markdown.lines().collect();
    let Some(start) = lines.iter().position(|line| VOCAB_START.is_match(line)) else {
        return Vec::new();
    };

    let mut segments: Vec<(usize, String)> = Vec::new();
    let mut buffer: Option<(usize, String)> = None;

    for (offset, raw) in lines[start + 1..].iter().enumerate() {
        let line_num = start + offset + 2;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            segments.extend(buffer.take());
            continue;
        }
        if indent_of(raw) == 0 && !trimmed.starts_with('-') && BLOCK_KEY.is_match(trimmed) {
            break;
        }
        if trimmed.starts_with('-') {
            segments.extend(buffer.take());
            let item = trimmed.trim_start_matches('-').trim_start();
            buffer = Some((line_num, item.to_string()));
            continue;
        }
        if let Some((_, text)) = buffer.as_mut() {
            text.push(' ');
            text.push_str(trimmed);
        }
    }
    segments.extend(buffer);

    segments
        .into_iter()
        .filter_map(|(line, segment)| match parse_inline_object(&segment, line) {
            Ok(object) => vocab_from_object(&object),
            Err(e) => {
                debug!(error = %e, "skipping vocab segment");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_inline_object() {
        let object = parse_inline_object(r#"{ si: "මම", en: 'I, me', translit: mama }"#, 1).unwrap();
        assert_eq!(object["si"], "මම");
        assert_eq!(object["en"], "I, me");
        assert_eq!(object["translit"], "mama");
    }

    #[test]
    fn test_parse_inline_object_rejects_plain_text() {
        let result = parse_inline_object("just words", 7);
        assert!(matches!(result, Err(ParseError::InvalidPair { line: 7, .. })));
    }

    #[test]
    fn test_extract_vocab_entries() {
        let markdown = r#"# Lesson 1
title: Greetings
vocab:
  - { si: "මම", en: "I", translit: "mama" }
  - { si: "ඔයා",
      en: "you",
      translit: "oya" }

  - { si: "ඔහු", en: "he" }
  - { en: "orphan" }
exercises:
  - { si: "ignored", en: "ignored" }
"#;
        let entries = extract_vocab_entries(markdown);
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.base.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("මම", "I"), ("ඔයා", "you"), ("ඔහු", "he")]);
        assert_eq!(entries[1].transliteration(), "oya");
    }

    #[test]
    fn test_extract_without_vocab_block() {
        assert!(extract_vocab_entries("title: nothing here\n").is_empty());
    }

    #[test]
    fn test_priority_flag() {
        let object = parse_inline_object("{ si: මම, en: I, priority: true }", 1).unwrap();
        assert!(vocab_from_object(&object).unwrap().priority);
    }
}
