//! Core types for the lesson content pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalize::{normalize_text, normalize_token_key};

/// A base-language / target-language word pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Native-script term.
    #[serde(rename = "si")]
    pub base: String,
    /// Translated term.
    #[serde(rename = "en")]
    pub target: String,
    #[serde(
        rename = "translit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transliteration: Option<String>,
    /// Priority entries win when duplicates collapse.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub priority: bool,
    /// Word-bank specific native form, if it differs from `base`.
    #[serde(rename = "wordBankSi", default, skip_serializing_if = "Option::is_none")]
    pub word_bank_base: Option<String>,
    /// Word-bank specific target form, if it differs from `target`.
    #[serde(rename = "wordBankEn", default, skip_serializing_if = "Option::is_none")]
    pub word_bank_target: Option<String>,
}

impl VocabEntry {
    /// Create an entry; `None` when either side is blank after trimming.
    pub fn new(base: &str, target: &str, transliteration: Option<&str>) -> Option<Self> {
        let base = normalize_text(base);
        let target = normalize_text(target);
        if base.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self {
            base,
            target,
            transliteration: transliteration
                .map(normalize_text)
                .filter(|value| !value.is_empty()),
            priority: false,
            word_bank_base: None,
            word_bank_target: None,
        })
    }

    /// Normalize a loosely shaped vocabulary record.
    pub fn from_raw(raw: &RawVocabEntry) -> Option<Self> {
        let transliteration = raw
            .translit
            .as_deref()
            .or(raw.transliteration.as_deref());
        let mut entry = Self::new(
            raw.si.as_deref().unwrap_or_default(),
            raw.en.as_deref().unwrap_or_default(),
            transliteration,
        )?;
        entry.priority = raw.priority.unwrap_or(false);
        entry.word_bank_base = non_blank(raw.word_bank_si.as_deref());
        entry.word_bank_target = non_blank(raw.word_bank_en.as_deref());
        Some(entry)
    }

    /// Normalize an arbitrary JSON value; non-objects and incomplete records yield `None`.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let raw: RawVocabEntry = serde_json::from_value(value.clone()).ok()?;
        Self::from_raw(&raw)
    }

    pub fn transliteration(&self) -> &str {
        self.transliteration.as_deref().unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|value| !value.is_empty())
}

/// Vocabulary record as authored in content files and lesson contexts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVocabEntry {
    #[serde(default)]
    pub si: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub translit: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub priority: Option<bool>,
    #[serde(default, alias = "wordbankSi")]
    pub word_bank_si: Option<String>,
    #[serde(default, alias = "wordbankEn")]
    pub word_bank_en: Option<String>,
}

/// One side of a vocabulary pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Base,
    Target,
}

impl VocabEntry {
    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Base => &self.base,
            Side::Target => &self.target,
        }
    }

    /// Both the native and the translated side carry text.
    pub fn is_complete(&self) -> bool {
        !self.base.trim().is_empty() && !self.target.trim().is_empty()
    }
}

/// A sentence inside a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub text: String,
    /// Ordered vocab references; the order reconstructs the sentence.
    pub tokens: Vec<String>,
    /// Lowest unit number at which the sentence is unlocked.
    #[serde(default)]
    pub min_unit: Option<u32>,
}

/// Lookup from normalized candidate keys to an index into a unit's vocab.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    keys: HashMap<String, usize>,
}

impl TokenMap {
    /// Build the map, registering every candidate key of every entry. The
    /// first entry to claim a key keeps it.
    pub fn build(entries: &[VocabEntry]) -> Self {
        let mut keys = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            for key in candidate_keys(entry) {
                keys.entry(key).or_insert(index);
            }
        }
        Self { keys }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Candidate lookup keys for an entry: transliteration (plus `yi`/`ayi`
/// word-final variants), English and native forms, each with a `v`→`w` variant.
pub fn candidate_keys(entry: &VocabEntry) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut register = |value: String| {
        if value.is_empty() {
            return;
        }
        let swapped = value.contains('v').then(|| value.replace('v', "w"));
        if !keys.contains(&value) {
            keys.push(value);
        }
        if let Some(swapped) = swapped {
            if !keys.contains(&swapped) {
                keys.push(swapped);
            }
        }
    };

    let translit_key = normalize_token_key(entry.transliteration());
    if !translit_key.is_empty() {
        register(translit_key.clone());
        register(replace_word_final(&translit_key, "yi", "i"));
        register(replace_word_final(&translit_key, "ayi", "ai"));
    }
    register(normalize_token_key(&entry.target));
    register(normalize_token_key(&entry.base));
    keys
}

/// Replace `suffix` when it ends the key.
fn replace_word_final(key: &str, suffix: &str, replacement: &str) -> String {
    match key.strip_suffix(suffix) {
        Some(stem) => format!("{stem}{replacement}"),
        None => key.to_string(),
    }
}

/// A unit with its vocabulary and sentences.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub slug: String,
    pub number: Option<u32>,
    pub title: String,
    pub section_id: Option<String>,
    pub section_number: Option<u32>,
    pub vocab: Vec<VocabEntry>,
    pub sentences: Vec<Sentence>,
    #[serde(skip)]
    pub token_map: TokenMap,
}

impl Unit {
    /// Create a unit and derive its token map.
    pub fn new(id: String, slug: String, vocab: Vec<VocabEntry>, sentences: Vec<Sentence>) -> Self {
        let token_map = TokenMap::build(&vocab);
        Self {
            id,
            slug,
            number: None,
            title: String::new(),
            section_id: None,
            section_number: None,
            vocab,
            sentences,
            token_map,
        }
    }

    /// Whether `candidate` names this unit by id, slug or number.
    pub fn matches_id(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        if candidate.is_empty() {
            return false;
        }
        self.id.trim().to_lowercase() == candidate
            || self.slug.trim().to_lowercase() == candidate
            || self.number.map(|n| n.to_string()) == Some(candidate)
    }
}

/// A visible course section.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub units: Vec<Unit>,
}

/// Visibility rule shared by sections and units: absent, blank, "ready" and
/// "published" are visible; anything else is not.
pub fn is_ready_status(status: Option<&str>) -> bool {
    match status.map(|s| s.trim().to_lowercase()) {
        None => true,
        Some(s) => s.is_empty() || s == "ready" || s == "published",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(base: &str, target: &str, translit: &str) -> VocabEntry {
        VocabEntry::new(base, target, Some(translit)).unwrap()
    }

    #[test]
    fn test_vocab_entry_requires_both_sides() {
        assert!(VocabEntry::new("  ", "hello", None).is_none());
        assert!(VocabEntry::new("ආයුබෝවන්", "", None).is_none());
        let entry = VocabEntry::new(" මම ", " I ", Some("  ")).unwrap();
        assert_eq!(entry.base, "මම");
        assert_eq!(entry.target, "I");
        assert_eq!(entry.transliteration, None);
    }

    #[test]
    fn test_vocab_entry_from_value() {
        let value = serde_json::json!({"si": "ඔයා", "en": "you", "transliteration": "oya"});
        let entry = VocabEntry::from_value(&value).unwrap();
        assert_eq!(entry.transliteration(), "oya");
        assert!(VocabEntry::from_value(&serde_json::json!("ඔයා")).is_none());
        assert!(VocabEntry::from_value(&serde_json::json!({"si": "ඔයා"})).is_none());
    }

    #[test]
    fn test_candidate_keys_include_variants() {
        let keys = candidate_keys(&entry("ස්තුතියි", "thank you", "sthuthiyi"));
        assert!(keys.contains(&"sthuthiyi".to_string()));
        assert!(keys.contains(&"sthuthii".to_string()));
        assert!(keys.contains(&"thank_you".to_string()));

        let keys = candidate_keys(&entry("සමාවෙන්න", "sorry", "samavenna"));
        assert!(keys.contains(&"samawenna".to_string()));

        let keys = candidate_keys(&entry("හොඳයි", "good", "hondayi"));
        assert!(keys.contains(&"hondai".to_string()));
    }

    #[test]
    fn test_token_map_first_entry_wins() {
        let vocab = vec![entry("මම", "I", "mama"), entry("මම", "me", "mama")];
        let map = TokenMap::build(&vocab);
        assert_eq!(map.get("mama"), Some(0));
        assert_eq!(map.get("me"), Some(1));
    }

    #[test]
    fn test_ready_status() {
        assert!(is_ready_status(None));
        assert!(is_ready_status(Some("")));
        assert!(is_ready_status(Some(" Published ")));
        assert!(is_ready_status(Some("ready")));
        assert!(!is_ready_status(Some("draft")));
        assert!(!is_ready_status(Some("coming-soon")));
    }

    #[test]
    fn test_unit_matches_id() {
        let mut unit = Unit::new("unit-03".into(), "unit-03".into(), vec![], vec![]);
        unit.number = Some(3);
        assert!(unit.matches_id("UNIT-03"));
        assert!(unit.matches_id("3"));
        assert!(!unit.matches_id("4"));
        assert!(!unit.matches_id(" "));
    }
}
