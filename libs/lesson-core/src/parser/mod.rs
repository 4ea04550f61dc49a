//! Parsers for the loosely structured course text assets.
//!
//! The asset formats are YAML-like but not YAML: every parser here reads line
//! by line and skips what it does not understand instead of failing the file.

pub mod fallback;
pub mod ids;
pub mod lesson;
pub mod sentences;
pub mod words;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub use lesson::{extract_vocab_entries, parse_inline_object};
pub use sentences::{parse_section_sentences, ParsedUnit, SectionContext};
pub use words::{parse_word_entry, parse_words};

static TRAILING_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#.*$").expect("valid regex"));

/// Remove one pair of matching surrounding quotes.
pub fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Parse a scalar that may be single- or double-quoted.
///
/// Double-quoted values are JSON-unescaped; single-quoted values are unescaped
/// the same way after escaping inner double quotes. Either falls back to the
/// raw inner text when unescaping fails.
pub fn parse_quoted_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return serde_json::from_str::<String>(trimmed)
            .unwrap_or_else(|_| trimmed[1..trimmed.len() - 1].to_string());
    }
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let escaped = format!("\"{}\"", inner.replace('"', "\\\""));
        return serde_json::from_str::<String>(&escaped).unwrap_or_else(|_| inner.to_string());
    }
    strip_quotes(trimmed).to_string()
}

/// Parse `[a, "b", 'c']`: JSON first, then a lenient comma split.
pub fn parse_array_literal(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
        return items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                _ => None,
            })
            .filter(|item| !item.is_empty())
            .collect();
    }
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .split(',')
        .map(|item| strip_quotes(item).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Drop a whitespace-separated `# comment` trailer and surrounding quotes.
pub fn strip_comment(value: &str) -> String {
    let without_comment = TRAILING_COMMENT.replace(value, "");
    strip_quotes(&without_comment).to_string()
}

/// Number of leading whitespace characters.
pub(crate) fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
