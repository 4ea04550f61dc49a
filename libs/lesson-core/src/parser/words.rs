//! Parser for `sections/<id>/words.yaml`.
//!
//! # Format
//! ```text
//! words:
//!   unit-01:
//!     - { si: "මම", en: "I", translit: "mama" }
//!     - oya        # you
//! ```
//! Bare tokens resolve through the fallback dictionary; the trailing comment
//! becomes the English gloss.

use tracing::debug;

use super::fallback::{self, token_label};
use super::lesson::parse_inline_object;
use super::strip_quotes;
use crate::error::ParseError;
use crate::types::VocabEntry;

/// Parse a words file into `(unit slug, entries)` in file order.
pub fn parse_words(content: &str) -> Vec<(String, Vec<VocabEntry>)> {
    let mut units: Vec<(String, Vec<VocabEntry>)> = Vec::new();
    let mut current: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !line.starts_with(' ') {
            current = None;
            continue;
        }

        if !trimmed.starts_with('-') {
            if let Some(key) = trimmed.strip_suffix(':') {
                let slug = strip_quotes(key).to_string();
                let index = match units.iter().position(|(existing, _)| *existing == slug) {
                    Some(index) => index,
                    None => {
                        units.push((slug, Vec::new()));
                        units.len() - 1
                    }
                };
                current = Some(index);
            }
            continue;
        }

        let Some(index) = current else {
            continue;
        };
        match parse_word_entry(trimmed, idx + 1) {
            Ok(Some(entry)) => units[index].1.push(entry),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "skipping word entry"),
        }
    }

    units
}

/// Parse one `- ...` list item.
///
/// Returns `Ok(None)` for items with nothing usable, such as an object with
/// no native-script form.
pub fn parse_word_entry(line: &str, line_num: usize) -> Result<Option<VocabEntry>, ParseError> {
    let trimmed = line.trim();
    let Some(item) = trimmed.strip_prefix('-') else {
        return Ok(None);
    };

    let (raw_content, comment) = match item.split_once('#') {
        Some((content, comment)) => (content, comment.trim()),
        None => (item, ""),
    };
    let content = raw_content.trim_start_matches('-').trim();
    if content.is_empty() {
        return Ok(None);
    }

    if content.starts_with('{') {
        if !content.ends_with('}') {
            return Err(ParseError::UnterminatedObject { line: line_num });
        }
        let object = parse_inline_object(content, line_num)?;
        let field = |key: &str| object.get(key).map(String::as_str).unwrap_or_default();
        let transliteration = match field("translit") {
            "" => field("transliteration"),
            value => value,
        };
        // An object without `en` has no meaning to show and is dropped.
        return Ok(VocabEntry::new(field("si"), field("en"), Some(transliteration)));
    }

    let label = token_label(content);
    let (base, transliteration) = match fallback::lookup(content) {
        Some(word) => (word.base.to_string(), word.transliteration.to_string()),
        None => (label.clone(), label),
    };
    let target = if comment.is_empty() {
        transliteration.as_str()
    } else {
        comment
    };
    Ok(VocabEntry::new(&base, target, Some(&transliteration)))
}
