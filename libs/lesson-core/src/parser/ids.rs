//! Number and identifier parsing for section and unit ids.

use regex::Regex;
use std::sync::LazyLock;

static UNIT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)unit[-_ ]?0*(\d+)").expect("valid regex"));
static COMPACT_UNIT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)u(\d+)").expect("valid regex"));
static SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)section[-_ ]?(\d+)").expect("valid regex"));
static COMPACT_SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)s(?:ection)?[-_ ]?0*(\d+)").expect("valid regex"));
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

fn capture_number(re: &Regex, value: &str) -> Option<u32> {
    re.captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a unit number from ids like `unit-03`, `Unit_3` or `u3`.
pub fn parse_unit_number(value: &str) -> Option<u32> {
    capture_number(&UNIT_NUMBER, value).or_else(|| capture_number(&COMPACT_UNIT_NUMBER, value))
}

/// Parse a section number from ids like `section-02`, `Section2` or `s2`.
pub fn parse_section_number(value: &str) -> Option<u32> {
    capture_number(&SECTION_NUMBER, value)
        .or_else(|| capture_number(&COMPACT_SECTION_NUMBER, value))
}

/// First run of digits anywhere in the value.
pub fn first_number(value: &str) -> Option<u32> {
    capture_number(&FIRST_NUMBER, value)
}

/// Canonical section id: `section-NN` when a section number is present,
/// otherwise a lower-case dash-separated slug.
pub fn normalize_section_id(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(number) = capture_number(&SECTION_NUMBER, trimmed) {
        return Some(format!("section-{}", pad_number(number)));
    }
    Some(SEPARATORS.replace_all(trimmed, "-").to_lowercase())
}

/// Zero-pad to two digits.
pub fn pad_number(value: u32) -> String {
    format!("{value:02}")
}

/// Slug used for units that only carry a number.
pub fn unit_slug(number: u32) -> String {
    format!("unit-{}", pad_number(number))
}
