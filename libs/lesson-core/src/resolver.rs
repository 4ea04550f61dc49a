//! Lesson vocabulary resolution.
//!
//! A lesson context (what the learner has open) is turned into vocabulary by
//! trying, in order: vocab carried inline by the context, the lesson source
//! named by the context, and the lesson manifest.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::course::{lenient_number, lenient_string};
use crate::error::{CoreError, ResolutionError, Result};
use crate::fetch::{fetch_json, ResourceFetcher};
use crate::normalize::{normalize_answer, normalize_text};
use crate::parser::extract_vocab_entries;
use crate::parser::ids::{pad_number, parse_section_number, parse_unit_number};
use crate::types::{Side, VocabEntry};

pub const MANIFEST_PATH: &str = "lesson.manifest.json";

/// Inline vocab is used only with at least this many distinct entries.
pub const MIN_INLINE_ENTRIES: usize = 4;

static LESSON_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*/)?lesson-\d+\.md$").expect("valid regex"));

/// What the learner currently has open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonContext {
    #[serde(default)]
    pub detail: Option<LessonDetail>,
    #[serde(default)]
    pub meta: Option<LessonMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub lesson_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab: Option<Vec<Value>>,
    /// Fields this crate does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonMeta {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub lesson_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub section_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
}

/// `lesson.manifest.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonManifest {
    #[serde(default)]
    pub lessons: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub lesson_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lesson_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: Option<String>,
}

/// A fetched lesson file and the vocabulary extracted from it.
#[derive(Debug, Clone, Serialize)]
pub struct LessonSource {
    pub path: String,
    pub markdown: String,
    pub vocab: Vec<VocabEntry>,
}

/// Strip `./` and leading `/`. Absolute URLs are returned untouched.
pub fn normalize_lesson_path(path: &str) -> Option<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http:") || lower.starts_with("https:") || trimmed.starts_with("//") {
        return Some(trimmed.to_string());
    }
    let mut rest = trimmed;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped.trim_start_matches('/');
    }
    let rest = rest.trim_start_matches('/');
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Valid inline entries when there are enough distinct values on `side`.
pub fn inline_vocabulary(context: &LessonContext, side: Side) -> Option<Vec<VocabEntry>> {
    let raw = context.detail.as_ref()?.vocab.as_ref()?;
    let entries: Vec<VocabEntry> = raw.iter().filter_map(VocabEntry::from_value).collect();
    if entries.len() < MIN_INLINE_ENTRIES {
        return None;
    }
    let distinct: HashSet<String> = entries
        .iter()
        .map(|entry| normalize_answer(entry.side(side)))
        .collect();
    (distinct.len() >= MIN_INLINE_ENTRIES).then_some(entries)
}

/// Keep only candidates matching `predicate`, unless none would remain.
fn narrow<'a>(
    candidates: Vec<&'a ManifestEntry>,
    predicate: impl Fn(&ManifestEntry) -> bool,
) -> Vec<&'a ManifestEntry> {
    let filtered: Vec<&ManifestEntry> = candidates.iter().copied().filter(|e| predicate(e)).collect();
    if filtered.is_empty() {
        candidates
    } else {
        filtered
    }
}

fn lower(value: Option<&str>) -> String {
    normalize_text(value.unwrap_or_default()).to_lowercase()
}

/// Pick the manifest entry for a context by narrowing on lesson id, section
/// number, unit number and lesson title in turn.
pub fn resolve_manifest_entry<'m>(
    manifest: &'m LessonManifest,
    context: &LessonContext,
) -> Option<&'m ManifestEntry> {
    let detail = context.detail.clone().unwrap_or_default();
    let meta = context.meta.clone().unwrap_or_default();
    let mut candidates: Vec<&ManifestEntry> = manifest.lessons.iter().collect();

    let lesson_ids: Vec<String> = [&detail.id, &detail.lesson_id, &meta.lesson_id]
        .into_iter()
        .map(|id| lower(id.as_deref()))
        .filter(|id| !id.is_empty())
        .collect();
    if !lesson_ids.is_empty() {
        candidates = narrow(candidates, |entry| {
            lesson_ids.contains(&lower(entry.lesson_id.as_deref()))
        });
    }

    let section_number = meta
        .section_number
        .or_else(|| detail.section_id.as_deref().and_then(parse_section_number))
        .filter(|n| *n > 0);
    if let Some(number) = section_number {
        let prefix = format!("section-{}", pad_number(number));
        candidates = narrow(candidates, |entry| {
            lower(entry.section_id.as_deref()).starts_with(&prefix)
        });
    }

    let unit_number = meta
        .unit_number
        .or_else(|| meta.unit_id.as_deref().and_then(parse_unit_number))
        .or_else(|| detail.unit_id.as_deref().and_then(parse_unit_number))
        .filter(|n| *n > 0);
    if let Some(number) = unit_number {
        let prefix = format!("unit-{}", pad_number(number));
        candidates = narrow(candidates, |entry| {
            lower(entry.unit_id.as_deref()).starts_with(&prefix)
        });
    }

    let titles: Vec<String> = [&detail.title, &meta.lesson_title]
        .into_iter()
        .map(|title| lower(title.as_deref()))
        .filter(|title| !title.is_empty())
        .collect();
    if !titles.is_empty() {
        candidates = narrow(candidates, |entry| {
            titles.contains(&lower(entry.lesson_title.as_deref()))
        });
    }

    candidates.first().copied()
}

/// Resolves lesson vocabulary through an injected fetcher and cache.
#[derive(Debug)]
pub struct VocabularyResolver<F> {
    fetcher: Arc<F>,
    cache: Arc<ContentCache>,
}

impl<F> Clone for VocabularyResolver<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<F: ResourceFetcher> VocabularyResolver<F> {
    pub fn new(fetcher: Arc<F>, cache: Arc<ContentCache>) -> Self {
        Self { fetcher, cache }
    }

    /// Vocabulary for a translate-to-base exercise (distinct targets required inline).
    pub async fn resolve_lesson_vocabulary(
        &self,
        context: Option<&mut LessonContext>,
    ) -> Result<Vec<VocabEntry>> {
        self.resolve_lesson_vocabulary_by(context, Side::Target).await
    }

    /// Vocabulary for a lesson, requiring distinct values on `side` for
    /// inline vocab to be used as is.
    pub async fn resolve_lesson_vocabulary_by(
        &self,
        context: Option<&mut LessonContext>,
        side: Side,
    ) -> Result<Vec<VocabEntry>> {
        let context = context.ok_or(ResolutionError::ContextUnavailable)?;

        if let Some(entries) = inline_vocabulary(context, side) {
            debug!(entries = entries.len(), "using inline lesson vocab");
            return Ok(entries);
        }

        let explicit = context
            .detail
            .as_ref()
            .and_then(|detail| detail.lesson_path.clone())
            .filter(|path| !path.trim().is_empty());
        let path = match explicit {
            Some(path) => path,
            None => self.path_from_manifest(context).await?,
        };

        let lesson = self.load_lesson_source(&path).await?;
        if lesson.vocab.is_empty() {
            return Err(ResolutionError::VocabMissing { path: lesson.path.clone() }.into());
        }
        Ok(lesson.vocab.clone())
    }

    /// The normalized lesson path for a context, consulting the manifest when
    /// the context does not name one.
    pub async fn resolve_lesson_path(&self, context: Option<&mut LessonContext>) -> Result<String> {
        let context = context.ok_or(ResolutionError::ContextUnavailable)?;
        let explicit = context
            .detail
            .as_ref()
            .and_then(|detail| detail.lesson_path.as_deref())
            .and_then(normalize_lesson_path);
        match explicit {
            Some(path) => Ok(path),
            None => self.path_from_manifest(context).await,
        }
    }

    /// Vocabulary of lessons 1..=`count` in the directory of the context's lesson.
    pub async fn resolve_lesson_vocabulary_batch(
        &self,
        context: Option<&mut LessonContext>,
        count: i64,
    ) -> Result<Vec<VocabEntry>> {
        if count <= 0 {
            return Ok(Vec::new());
        }
        let path = self.resolve_lesson_path(context).await?;
        let Some(caps) = LESSON_FILE.captures(&path) else {
            return Err(ResolutionError::PathUnresolvable {
                reason: format!("unexpected lesson path format: {path}"),
            }
            .into());
        };
        let directory = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let mut vocab = Vec::new();
        for number in 1..=count {
            let candidate = format!("{directory}lesson-{number:02}.md");
            match self.load_lesson_source(&candidate).await {
                Ok(lesson) => vocab.extend(lesson.vocab.iter().cloned()),
                Err(e) => warn!(lesson = number, path = %candidate, error = %e, "skipping lesson"),
            }
        }
        info!(lessons = count, entries = vocab.len(), "collected lesson vocab");
        Ok(vocab)
    }

    /// Fetch a lesson source and extract its vocab. Memoized per path.
    pub async fn load_lesson_source(&self, path: &str) -> Result<Arc<LessonSource>> {
        let normalized = normalize_lesson_path(path).ok_or_else(|| ResolutionError::PathUnresolvable {
            reason: format!("invalid lesson path: {path:?}"),
        })?;
        self.cache
            .lessons
            .get_or_load(&normalized, || async {
                let markdown = self.fetcher.fetch_text(&normalized).await?;
                let vocab = extract_vocab_entries(&markdown);
                Ok::<_, CoreError>(Arc::new(LessonSource {
                    path: normalized.clone(),
                    markdown,
                    vocab,
                }))
            })
            .await
    }

    pub async fn load_manifest(&self) -> Result<Arc<LessonManifest>> {
        self.cache
            .manifest
            .get_or_load(MANIFEST_PATH, || async {
                let manifest: LessonManifest = fetch_json(self.fetcher.as_ref(), MANIFEST_PATH).await?;
                Ok::<_, CoreError>(Arc::new(manifest))
            })
            .await
    }

    /// Resolve a path via the manifest and record it on the context.
    async fn path_from_manifest(&self, context: &mut LessonContext) -> Result<String> {
        let manifest = self.load_manifest().await?;
        let path = resolve_manifest_entry(&manifest, context)
            .and_then(|entry| entry.path.as_deref())
            .ok_or_else(|| ResolutionError::PathUnresolvable {
                reason: "no manifest entry matches the lesson".to_string(),
            })?;
        let normalized = normalize_lesson_path(path).ok_or_else(|| ResolutionError::PathUnresolvable {
            reason: format!("manifest path is empty for the lesson: {path:?}"),
        })?;

        debug!(path = %normalized, "lesson path resolved from manifest");
        context
            .detail
            .get_or_insert_with(LessonDetail::default)
            .lesson_path = Some(normalized.clone());
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::MemoryFetcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const MANIFEST: &str = r#"{
      "lessons": [
        { "lessonId": "lesson-01", "sectionId": "section-01-basics", "unitId": "unit-01-greetings",
          "lessonTitle": "Hello", "path": "./lessons/section-01/unit-01/lesson-01.md" },
        { "lessonId": "lesson-02", "sectionId": "section-01-basics", "unitId": "unit-01-greetings",
          "lessonTitle": "Goodbye", "path": "lessons/section-01/unit-01/lesson-02.md" },
        { "lessonId": "lesson-01", "sectionId": "section-01-basics", "unitId": "unit-02-pronouns",
          "lessonTitle": "Me and you", "path": "/lessons/section-01/unit-02/lesson-01.md" }
      ]
    }"#;

    const LESSON_ONE: &str = r#"vocab:
  - { si: "ආයුබෝවන්", en: "hello", translit: "ayubowan" }
  - { si: "ස්තුතියි", en: "thank you", translit: "sthuthiyi" }
"#;

    const LESSON_TWO: &str = r#"vocab:
  - { si: "ගිහින් එන්නම්", en: "goodbye", translit: "gihin ennam" }
"#;

    const PRONOUNS: &str = r#"vocab:
  - { si: "මම", en: "I", translit: "mama" }
  - { si: "ඔයා", en: "you", translit: "oya" }
"#;

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::new()
            .with(MANIFEST_PATH, MANIFEST)
            .with("lessons/section-01/unit-01/lesson-01.md", LESSON_ONE)
            .with("lessons/section-01/unit-01/lesson-02.md", LESSON_TWO)
            .with("lessons/section-01/unit-02/lesson-01.md", PRONOUNS)
    }

    fn resolver(fetcher: MemoryFetcher) -> (VocabularyResolver<MemoryFetcher>, Arc<MemoryFetcher>) {
        let fetcher = Arc::new(fetcher);
        let resolver = VocabularyResolver::new(fetcher.clone(), Arc::new(ContentCache::new()));
        (resolver, fetcher)
    }

    fn context(value: Value) -> LessonContext {
        serde_json::from_value(value).unwrap()
    }

    fn bases(entries: &[VocabEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.base.as_str()).collect()
    }

    #[tokio::test]
    async fn test_inline_vocab_needs_no_fetch() {
        let (resolver, fetcher) = resolver(MemoryFetcher::new());
        let mut ctx = context(json!({
            "detail": {
                "lessonPath": "lessons/never-fetched.md",
                "vocab": [
                    {"si": "මම", "en": "I"},
                    {"si": "ඔයා", "en": "you"},
                    {"si": "ඔහු", "en": "he"},
                    {"si": "ඇය", "en": "she"}
                ]
            }
        }));
        let entries = resolver.resolve_lesson_vocabulary(Some(&mut ctx)).await.unwrap();
        assert_eq!(bases(&entries), vec!["මම", "ඔයා", "ඔහු", "ඇය"]);
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn test_inline_vocab_with_duplicate_targets_falls_through() {
        let (resolver, fetcher) = resolver(fetcher());
        let mut ctx = context(json!({
            "detail": {
                "lessonPath": "lessons/section-01/unit-02/lesson-01.md",
                "vocab": [
                    {"si": "මම", "en": "I"},
                    {"si": "මං", "en": "i"},
                    {"si": "ඔහු", "en": "he"},
                    {"si": "ඇය", "en": "she"}
                ]
            }
        }));
        let entries = resolver.resolve_lesson_vocabulary(Some(&mut ctx)).await.unwrap();
        assert_eq!(bases(&entries), vec!["මම", "ඔයා"]);
        assert_eq!(fetcher.requests(), vec!["lessons/section-01/unit-02/lesson-01.md"]);
    }

    #[tokio::test]
    async fn test_distinct_base_side() {
        let (resolver, _) = resolver(fetcher());
        let mut ctx = context(json!({
            "detail": {
                "vocab": [
                    {"si": "මම", "en": "I"},
                    {"si": "මම", "en": "me"},
                    {"si": "ඔහු", "en": "he"},
                    {"si": "ඇය", "en": "she"}
                ]
            },
            "meta": {"lessonId": "lesson-01", "unitId": "u2"}
        }));
        assert!(inline_vocabulary(&ctx, Side::Target).is_some());
        let entries = resolver
            .resolve_lesson_vocabulary_by(Some(&mut ctx), Side::Base)
            .await
            .unwrap();
        assert_eq!(bases(&entries), vec!["මම", "ඔයා"]);
    }

    #[tokio::test]
    async fn test_missing_context() {
        let (resolver, _) = resolver(fetcher());
        let result = resolver.resolve_lesson_vocabulary(None).await;
        assert_eq!(result, Err(CoreError::Resolution(ResolutionError::ContextUnavailable)));
    }

    #[tokio::test]
    async fn test_manifest_path_is_written_back() {
        let (resolver, _) = resolver(fetcher());
        let mut ctx = context(json!({
            "meta": {"lessonId": "lesson-02", "sectionNumber": 1, "lessonTitle": "goodbye"}
        }));
        let entries = resolver.resolve_lesson_vocabulary(Some(&mut ctx)).await.unwrap();
        assert_eq!(entries[0].target, "goodbye");
        assert_eq!(
            ctx.detail.unwrap().lesson_path.as_deref(),
            Some("lessons/section-01/unit-01/lesson-02.md")
        );
    }

    #[tokio::test]
    async fn test_vocab_missing() {
        let fetcher = MemoryFetcher::new().with("lessons/empty.md", "title: nothing\n");
        let (resolver, _) = resolver(fetcher);
        let mut ctx = context(json!({"detail": {"lessonPath": "./lessons/empty.md"}}));
        let result = resolver.resolve_lesson_vocabulary(Some(&mut ctx)).await;
        assert_eq!(
            result,
            Err(CoreError::Resolution(ResolutionError::VocabMissing {
                path: "lessons/empty.md".to_string()
            }))
        );
    }

    #[tokio::test]
    async fn test_unmatched_manifest() {
        let fetcher = MemoryFetcher::new().with(MANIFEST_PATH, r#"{"lessons": []}"#);
        let (resolver, _) = resolver(fetcher);
        let mut ctx = LessonContext::default();
        let result = resolver.resolve_lesson_vocabulary(Some(&mut ctx)).await;
        assert!(matches!(
            result,
            Err(CoreError::Resolution(ResolutionError::PathUnresolvable { .. }))
        ));
    }

    #[test]
    fn test_manifest_narrowing_ignores_emptying_steps() {
        let manifest: LessonManifest = serde_json::from_str(MANIFEST).unwrap();

        let ctx = context(json!({"meta": {"lessonId": "lesson-01", "unitNumber": 2}}));
        let entry = resolve_manifest_entry(&manifest, &ctx).unwrap();
        assert_eq!(entry.unit_id.as_deref(), Some("unit-02-pronouns"));

        let ctx = context(json!({"meta": {"lessonId": "lesson-01", "unitNumber": 9}}));
        let entry = resolve_manifest_entry(&manifest, &ctx).unwrap();
        assert_eq!(entry.unit_id.as_deref(), Some("unit-01-greetings"));

        let ctx = context(json!({"detail": {"title": "Me and You"}}));
        let entry = resolve_manifest_entry(&manifest, &ctx).unwrap();
        assert_eq!(entry.lesson_title.as_deref(), Some("Me and you"));

        let empty = LessonManifest::default();
        assert!(resolve_manifest_entry(&empty, &ctx).is_none());
    }

    #[tokio::test]
    async fn test_batch_accumulates_and_skips_failures() {
        let (resolver, _) = resolver(fetcher());
        let mut ctx = context(json!({
            "detail": {"lessonPath": "lessons/section-01/unit-01/lesson-02.md"}
        }));
        let entries = resolver
            .resolve_lesson_vocabulary_batch(Some(&mut ctx), 3)
            .await
            .unwrap();
        let targets: Vec<&str> = entries.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["hello", "thank you", "goodbye"]);
    }

    #[tokio::test]
    async fn test_batch_edge_cases() {
        let (resolver, fetcher) = resolver(fetcher());
        let entries = resolver.resolve_lesson_vocabulary_batch(None, 0).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(fetcher.request_count(), 0);

        let mut ctx = context(json!({"detail": {"lessonPath": "lessons/intro.md"}}));
        let result = resolver.resolve_lesson_vocabulary_batch(Some(&mut ctx), 2).await;
        assert!(matches!(
            result,
            Err(CoreError::Resolution(ResolutionError::PathUnresolvable { .. }))
        ));
    }

    #[tokio::test]
    async fn test_lesson_sources_are_cached() {
        let (resolver, fetcher) = resolver(fetcher());
        for _ in 0..2 {
            resolver
                .load_lesson_source("lessons/section-01/unit-01/lesson-01.md")
                .await
                .unwrap();
        }
        assert_eq!(fetcher.request_count(), 1);
    }

    #[test]
    fn test_normalize_lesson_path() {
        assert_eq!(normalize_lesson_path("./lessons/a.md").as_deref(), Some("lessons/a.md"));
        assert_eq!(normalize_lesson_path("///lessons/a.md").as_deref(), Some("lessons/a.md"));
        assert_eq!(
            normalize_lesson_path("https://cdn.example.com/a.md").as_deref(),
            Some("https://cdn.example.com/a.md")
        );
        assert_eq!(normalize_lesson_path("  "), None);
        assert_eq!(normalize_lesson_path("./"), None);
    }

    #[test]
    fn test_context_keeps_unknown_fields() {
        let ctx = context(json!({"detail": {"id": 7, "exercises": ["a"]}}));
        let detail = ctx.detail.unwrap();
        assert_eq!(detail.id.as_deref(), Some("7"));
        assert_eq!(detail.extra["exercises"], json!(["a"]));
    }
}
