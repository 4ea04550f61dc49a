//! Course hierarchy loading.
//!
//! `course.map.json` lists sections and units with their publication status.
//! Each visible section contributes `sections/<id>/sentences.yaml` and
//! `sections/<id>/words.yaml`; the two are merged into [`Unit`]s.

mod lessons;

pub use lessons::{
    flatten_unit_lessons, lesson_counter_text, lesson_position, unit_lessons_path, unit_progress,
    CourseIndex, IndexLevel, IndexSection, IndexSkill, IndexUnit, LessonPosition, LessonQuery,
    LessonRef, LessonReference, UnitLessonData, UnitProgress, COURSE_INDEX_PATH,
};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::error::{LoadError, Result};
use crate::fetch::{fetch_json, ResourceFetcher};
use crate::normalize::normalize_token_key;
use crate::parser::fallback::{self, token_label};
use crate::parser::ids::{parse_section_number, parse_unit_number, unit_slug};
use crate::parser::{parse_section_sentences, parse_words, ParsedUnit, SectionContext};
use crate::types::{candidate_keys, is_ready_status, Section, Sentence, Unit, VocabEntry};

pub const COURSE_MAP_PATH: &str = "course.map.json";

/// Accept a JSON number or numeric string; anything else reads as absent.
pub(crate) fn lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_u32))
}

/// Accept a JSON string, number or bool as text; blank strings read as absent.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_string))
}

pub(crate) fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `course.map.json` as published.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseMap {
    #[serde(default)]
    pub sections: Vec<CourseMapSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseMapSection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub units: Vec<CourseMapUnit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseMapUnit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub path_ref: Option<String>,
}

/// A visible section with its units split by visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMeta {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub units: Vec<UnitMeta>,
    pub hidden_units: Vec<UnitMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMeta {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub path_ref: String,
}

impl SectionMeta {
    /// Whether a unit named in the section assets is unpublished in the course map.
    fn hides(&self, slug: &str, number: Option<u32>) -> bool {
        let slug = slug.trim().to_lowercase();
        let by_id = |unit: &UnitMeta| unit.id.to_lowercase() == slug;
        if self.hidden_units.iter().any(by_id) {
            return true;
        }
        if self.units.iter().any(by_id) {
            return false;
        }
        number.is_some_and(|n| {
            self.hidden_units.iter().any(|unit| unit.number == n)
                && !self.units.iter().any(|unit| unit.number == n)
        })
    }

    /// Number and title for a words-file unit slug.
    fn unit_meta_for_slug(&self, slug: &str) -> (Option<u32>, String) {
        let lower = slug.trim().to_lowercase();
        if let Some(unit) = self.units.iter().find(|unit| unit.id.to_lowercase() == lower) {
            return (Some(unit.number), unit.title.clone());
        }
        let number = parse_unit_number(slug);
        if let Some(unit) = number.and_then(|n| self.units.iter().find(|unit| unit.number == n)) {
            return (Some(unit.number), unit.title.clone());
        }
        (number, String::new())
    }

    fn context(&self) -> SectionContext {
        SectionContext {
            section_id: Some(self.id.clone()),
            section_number: Some(self.number),
            section_title: Some(self.title.clone()).filter(|t| !t.is_empty()),
        }
    }
}

/// Sections and units whose status is ready, published, or unset.
pub fn visible_sections(map: &CourseMap) -> Vec<SectionMeta> {
    map.sections
        .iter()
        .enumerate()
        .filter(|(_, section)| is_ready_status(section.status.as_deref()))
        .map(|(section_index, section)| {
            let id = section
                .id
                .clone()
                .unwrap_or_else(|| format!("section-{}", section_index + 1));
            let number = section
                .number
                .or_else(|| parse_section_number(&id))
                .unwrap_or(section_index as u32 + 1);

            let mut units = Vec::new();
            let mut hidden_units = Vec::new();
            for (unit_index, unit) in section.units.iter().enumerate() {
                let unit_id = unit
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("unit-{}", unit_index + 1));
                let meta = UnitMeta {
                    number: unit
                        .number
                        .or_else(|| parse_unit_number(&unit_id))
                        .unwrap_or(unit_index as u32 + 1),
                    id: unit_id,
                    title: unit.title.clone().unwrap_or_default(),
                    path_ref: unit.path_ref.clone().unwrap_or_default(),
                };
                if is_ready_status(unit.status.as_deref()) {
                    units.push(meta);
                } else {
                    hidden_units.push(meta);
                }
            }

            SectionMeta {
                id,
                number,
                title: section.title.clone().unwrap_or_default(),
                units,
                hidden_units,
            }
        })
        .collect()
}

/// Fill number, slug and name of parsed sentence units from course map metadata.
pub fn enrich_parsed_units(section: &SectionMeta, units: &mut [ParsedUnit]) {
    let by_slug: HashMap<String, &UnitMeta> = section
        .units
        .iter()
        .map(|meta| (meta.id.to_lowercase(), meta))
        .collect();
    let by_number: HashMap<u32, &UnitMeta> =
        section.units.iter().map(|meta| (meta.number, meta)).collect();

    for (index, unit) in units.iter_mut().enumerate() {
        let meta = unit
            .slug
            .as_ref()
            .and_then(|slug| by_slug.get(&slug.to_lowercase()))
            .or_else(|| unit.numeric_id.and_then(|n| by_number.get(&n)))
            .or_else(|| match unit.number {
                None => by_number.get(&(index as u32 + 1)),
                Some(_) => None,
            });

        if let Some(meta) = meta {
            unit.number = Some(meta.number);
            if unit.slug.is_none() {
                unit.slug = Some(meta.id.clone());
            }
            if unit.name.is_empty() {
                unit.name = meta.title.clone();
            }
        }

        unit.section_id = Some(section.id.clone());
        unit.section_number = Some(section.number);

        if unit.slug.is_none() {
            unit.slug = unit.number.or(unit.numeric_id).map(unit_slug);
        }
    }
}

/// Vocabulary parsed from a words file for one unit slug.
#[derive(Debug, Clone)]
pub struct WordUnit {
    pub slug: String,
    pub vocab: Vec<VocabEntry>,
    pub unit_number: Option<u32>,
    pub unit_title: String,
}

/// Join word units to sentence units by slug, then by number. Sentence units
/// without words are appended with empty vocabulary.
pub fn merge_units(section: &SectionMeta, words: Vec<WordUnit>, sentences: &[ParsedUnit]) -> Vec<Unit> {
    let mut by_slug: HashMap<String, &ParsedUnit> = HashMap::new();
    let mut by_number: HashMap<u32, &ParsedUnit> = HashMap::new();
    for unit in sentences {
        if let Some(slug) = unit.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            by_slug.insert(slug.to_lowercase(), unit);
        }
        if let Some(number) = unit.number.or(unit.numeric_id) {
            by_number.insert(number, unit);
        }
    }

    let mut units: Vec<Unit> = Vec::new();
    for word_unit in words {
        let slug = word_unit.slug.trim().to_string();
        if slug.is_empty() {
            continue;
        }
        let target_number = word_unit.unit_number.or_else(|| parse_unit_number(&slug));
        let sentence_unit = by_slug
            .get(&slug.to_lowercase())
            .or_else(|| target_number.and_then(|n| by_number.get(&n)))
            .copied();

        let title = sentence_unit
            .map(|unit| unit.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| Some(word_unit.unit_title.clone()).filter(|t| !t.is_empty()))
            .or_else(|| target_number.map(|n| format!("Unit {n}")))
            .unwrap_or_else(|| slug.clone());

        let sentences = sentence_unit
            .map(|unit| unit.sentences.clone())
            .unwrap_or_default();

        let mut unit = Unit::new(slug.clone(), slug, word_unit.vocab, sentences);
        unit.number = target_number.or_else(|| sentence_unit.and_then(|u| u.number));
        unit.title = title;
        unit.section_id = Some(section.id.clone());
        unit.section_number = Some(section.number);
        units.push(unit);
    }

    for sentence_unit in sentences {
        let base_slug = sentence_unit
            .slug
            .clone()
            .or_else(|| sentence_unit.number.map(unit_slug))
            .unwrap_or_else(|| sentence_unit.raw_id.clone());
        let exists = units
            .iter()
            .any(|unit| unit.slug == base_slug || unit.id == sentence_unit.raw_id);
        if exists {
            continue;
        }

        let mut unit = Unit::new(
            base_slug.clone(),
            base_slug.clone(),
            Vec::new(),
            sentence_unit.sentences.clone(),
        );
        unit.number = sentence_unit
            .number
            .or_else(|| parse_unit_number(&base_slug))
            .or(sentence_unit.numeric_id);
        unit.title = if sentence_unit.name.is_empty() {
            base_slug
        } else {
            sentence_unit.name.clone()
        };
        unit.section_id = sentence_unit.section_id.clone();
        unit.section_number = sentence_unit.section_number;
        units.push(unit);
    }

    units
}

/// Everything derived from the course map and section assets.
#[derive(Debug, Clone, Default)]
pub struct CourseContent {
    pub sections: Vec<Section>,
    pub sentence_units: Vec<ParsedUnit>,
}

/// Loads and memoizes the course hierarchy through an injected fetcher and cache.
#[derive(Debug)]
pub struct CourseLoader<F> {
    fetcher: Arc<F>,
    cache: Arc<ContentCache>,
}

impl<F> Clone for CourseLoader<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<F: ResourceFetcher> CourseLoader<F> {
    pub fn new(fetcher: Arc<F>, cache: Arc<ContentCache>) -> Self {
        Self { fetcher, cache }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Visible sections with merged units. Memoized after the first success.
    pub async fn load_course_hierarchy(&self) -> Result<Vec<Section>> {
        Ok(self.load_content().await?.sections.clone())
    }

    /// Every unit of every visible section, in course order.
    pub async fn load_word_bank_units(&self) -> Result<Vec<Unit>> {
        let content = self.load_content().await?;
        Ok(content
            .sections
            .iter()
            .flat_map(|section| section.units.iter().cloned())
            .collect())
    }

    /// Sentence units as parsed from the section assets, with their vocab tokens.
    pub async fn load_section_sentences(&self) -> Result<Vec<ParsedUnit>> {
        Ok(self.load_content().await?.sentence_units.clone())
    }

    async fn load_content(&self) -> Result<Arc<CourseContent>> {
        self.cache
            .course
            .get_or_load(COURSE_MAP_PATH, || self.build_content())
            .await
    }

    async fn build_content(&self) -> Result<Arc<CourseContent>> {
        let map: CourseMap = fetch_json(self.fetcher.as_ref(), COURSE_MAP_PATH).await?;
        let metas = visible_sections(&map);
        info!(sections = metas.len(), "loading course hierarchy");

        let mut content = CourseContent::default();
        for meta in metas {
            let mut parsed = self.fetch_section_sentences(&meta).await;
            parsed.retain(|unit| {
                let slug = unit.slug.as_deref().unwrap_or(&unit.raw_id);
                !meta.hides(slug, unit.number.or(unit.numeric_id))
            });
            let words = self.fetch_section_words(&meta).await;
            let units = merge_units(&meta, words, &parsed);
            debug!(section = %meta.id, units = units.len(), "section loaded");

            content.sentence_units.extend(parsed);
            content.sections.push(Section {
                id: meta.id,
                number: meta.number,
                title: meta.title,
                units,
            });
        }
        Ok(Arc::new(content))
    }

    /// Fetch a section asset; failures are logged and read as absent.
    async fn fetch_section_text(&self, section_id: &str, file: &str) -> Option<String> {
        let path = format!("sections/{section_id}/{file}");
        match self.fetcher.fetch_text(&path).await {
            Ok(text) => Some(text),
            Err(LoadError::NotFound { .. }) => {
                debug!(path = %path, "section asset not found");
                None
            }
            Err(e) => {
                warn!(section = %section_id, error = %e, "skipping section asset");
                None
            }
        }
    }

    async fn fetch_section_sentences(&self, section: &SectionMeta) -> Vec<ParsedUnit> {
        let Some(text) = self.fetch_section_text(&section.id, "sentences.yaml").await else {
            return Vec::new();
        };
        let mut units = parse_section_sentences(&text, &section.context());
        enrich_parsed_units(section, &mut units);
        units
    }

    async fn fetch_section_words(&self, section: &SectionMeta) -> Vec<WordUnit> {
        let Some(text) = self.fetch_section_text(&section.id, "words.yaml").await else {
            return Vec::new();
        };
        parse_words(&text)
            .into_iter()
            .filter(|(slug, _)| !slug.is_empty())
            .filter_map(|(slug, vocab)| {
                let (unit_number, unit_title) = section.unit_meta_for_slug(&slug);
                if section.hides(&slug, unit_number) {
                    debug!(unit = %slug, "skipping unpublished unit");
                    return None;
                }
                Some(WordUnit {
                    slug,
                    vocab,
                    unit_number,
                    unit_title,
                })
            })
            .collect()
    }
}

/// Pick the unit named by `unit_id` (id, slug or number, case-insensitive),
/// falling back to the first unit.
pub fn resolve_active_unit<'a>(units: &'a [Unit], unit_id: Option<&str>) -> Option<&'a Unit> {
    unit_id
        .and_then(|id| units.iter().find(|unit| unit.matches_id(id)))
        .or_else(|| units.first())
}

/// A sentence paired with the unit it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct UnitSentence<'a> {
    pub sentence: &'a Sentence,
    pub unit: &'a Unit,
}

pub fn flatten_sentences(units: &[Unit]) -> Vec<UnitSentence<'_>> {
    units
        .iter()
        .flat_map(|unit| {
            unit.sentences
                .iter()
                .map(move |sentence| UnitSentence { sentence, unit })
        })
        .collect()
}

/// Numeric unit used for sentence gating. Missing, non-positive or
/// non-numeric ids count as unit 1.
pub fn determine_unit_number(unit_id: Option<&str>) -> u32 {
    unit_id
        .and_then(|id| id.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1)
}

pub fn is_sentence_unlocked(sentence: &Sentence, unit_number: u32) -> bool {
    sentence.min_unit.map_or(true, |min| min <= unit_number)
}

/// Sentences whose `min_unit` is at most the given unit.
pub fn filter_unlocked_sentences<'a>(
    sentences: impl IntoIterator<Item = &'a Sentence>,
    unit_id: Option<&str>,
) -> Vec<&'a Sentence> {
    let unit_number = determine_unit_number(unit_id);
    sentences
        .into_iter()
        .filter(|sentence| is_sentence_unlocked(sentence, unit_number))
        .collect()
}

/// Resolve a sentence token to a word: token map, then a scan of the unit
/// vocabulary, then the fallback dictionary, then the token itself as a label.
pub fn word_entry_for_token(unit: &Unit, token: &str) -> Option<VocabEntry> {
    let key = normalize_token_key(token);
    if key.is_empty() {
        return None;
    }

    let found = unit
        .token_map
        .get(&key)
        .and_then(|index| unit.vocab.get(index))
        .or_else(|| {
            unit.vocab
                .iter()
                .find(|entry| candidate_keys(entry).contains(&key))
        });

    let entry = match found {
        Some(entry) => VocabEntry {
            transliteration: entry
                .transliteration
                .clone()
                .or_else(|| Some(token.to_string())),
            ..entry.clone()
        },
        None => {
            let label = token_label(token);
            let (base, transliteration) = match fallback::lookup(token) {
                Some(word) => (word.base.to_string(), word.transliteration.to_string()),
                None => (label.clone(), label.clone()),
            };
            VocabEntry {
                base,
                target: label,
                transliteration: Some(transliteration),
                priority: false,
                word_bank_base: None,
                word_bank_target: None,
            }
        }
    };
    Some(entry)
}
