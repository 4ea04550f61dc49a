//! API request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Re-export shared types from lesson-core
pub use lesson_core::course::{LessonPosition, LessonQuery};
pub use lesson_core::exercise::{ExerciseConfig, ExerciseKind, WordBankDirection};
pub use lesson_core::{LessonContext, Section, Side, Unit, VocabEntry};

// === Course ===

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitsQuery {
    /// Restrict to one section, by id.
    pub section_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnitsResponse {
    pub units: Vec<Unit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPositionResponse {
    #[serde(flatten)]
    pub position: LessonPosition,
    /// "Lesson X of Y" when both sides are known.
    pub counter: Option<String>,
}

// === Vocabulary ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveVocabRequest {
    pub context: Option<LessonContext>,
    /// Side whose values must be distinct for inline vocab to be used.
    #[serde(default = "default_side")]
    pub side: Side,
}

fn default_side() -> Side {
    Side::Target
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveVocabResponse {
    pub vocab: Vec<VocabEntry>,
    /// The context after resolution, including a lesson path found via the manifest.
    pub context: LessonContext,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVocabRequest {
    pub context: Option<LessonContext>,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct VocabListResponse {
    pub vocab: Vec<VocabEntry>,
}

// === Exercises ===

/// Body of `POST /api/exercises/:kind`. Which fields apply depends on the kind.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    /// Authored config for dialogue, fill-blank and prepared choice exercises.
    pub config: Option<Value>,
    /// Vocabulary to build from directly, as `{si, en, translit}` records.
    pub vocab: Option<Vec<Value>>,
    /// Lesson context to resolve vocabulary from when `vocab` is absent.
    pub context: Option<LessonContext>,
    /// Word bank: unit id, slug or number. Defaults to the first unit.
    pub unit_id: Option<String>,
    /// Word bank: index into the unit's unlocked sentences. Random when absent.
    pub sentence_index: Option<usize>,
    pub direction: Option<WordBankDirection>,
    pub profile_name: Option<String>,
    /// Seed for reproducible shuffles.
    pub seed: Option<u64>,
}

// === Answers ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheckRequest {
    /// Accepted answers, or the expected word order for a sequence check.
    pub answers: Vec<String>,
    pub value: Option<String>,
    /// Word-bank attempt, compared position by position with `answers`.
    pub attempt: Option<Vec<String>>,
    pub direction: Option<WordBankDirection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerCheckResponse {
    pub correct: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
