//! Lesson hierarchy: skills, levels and lessons inside a unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{lenient_number, lenient_string, CourseLoader};
use crate::error::{CoreError, Result};
use crate::fetch::{fetch_json, ResourceFetcher};

pub const COURSE_INDEX_PATH: &str = "data/course.index.json";

/// Path of the lesson detail file for a unit.
pub fn unit_lessons_path(unit_id: &str) -> String {
    format!("data/{unit_id}.lessons.json")
}

/// `course.index.json`: either a bare section list or `{ "sections": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CourseIndexDocument")]
pub struct CourseIndex {
    pub sections: Vec<IndexSection>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CourseIndexDocument {
    List(Vec<IndexSection>),
    Wrapped {
        #[serde(default)]
        sections: Vec<IndexSection>,
    },
}

impl From<CourseIndexDocument> for CourseIndex {
    fn from(document: CourseIndexDocument) -> Self {
        match document {
            CourseIndexDocument::List(sections) | CourseIndexDocument::Wrapped { sections } => {
                Self { sections }
            }
        }
    }
}

impl CourseIndex {
    /// Find a unit and its section by unit id.
    pub fn find_unit(&self, unit_id: &str) -> Option<(&IndexSection, &IndexUnit)> {
        self.sections.iter().find_map(|section| {
            section
                .units
                .iter()
                .find(|unit| unit.id == unit_id)
                .map(|unit| (section, unit))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default)]
    pub units: Vec<IndexUnit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexUnit {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonRef>,
    #[serde(default)]
    pub skills: Vec<IndexSkill>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSkill {
    #[serde(default, deserialize_with = "lenient_string")]
    pub skill_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub levels: Vec<IndexLevel>,
}

impl IndexSkill {
    pub fn key(&self) -> &str {
        self.skill_id.as_deref().or(self.id.as_deref()).unwrap_or_default()
    }

    fn matches(&self, skill_id: &str) -> bool {
        self.skill_id.as_deref() == Some(skill_id) || self.id.as_deref() == Some(skill_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexLevel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub level_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lesson_count: Option<u32>,
    #[serde(default)]
    pub lessons: Vec<LessonRef>,
}

impl IndexLevel {
    pub fn key(&self) -> &str {
        self.level_id.as_deref().or(self.id.as_deref()).unwrap_or_default()
    }

    fn matches(&self, level_id: &str) -> bool {
        self.level_id.as_deref() == Some(level_id) || self.id.as_deref() == Some(level_id)
    }
}

/// A lesson listed by id or as an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonRef {
    Id(String),
    Entry(LessonRefEntry),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRefEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lesson_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub lesson_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub skill_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level_id: Option<String>,
}

impl LessonRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Entry(entry) => entry
                .id
                .as_deref()
                .or(entry.lesson_id.as_deref())
                .unwrap_or_default(),
            Self::Other(_) => "",
        }
    }

    fn lesson_type(&self) -> Option<&str> {
        match self {
            Self::Entry(entry) => entry.lesson_type.as_deref(),
            _ => None,
        }
    }
}

/// A lesson leaf flattened out of its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonReference {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(rename = "type")]
    pub lesson_type: Option<String>,
    pub is_review: bool,
    pub skill_id: String,
    pub level_id: String,
    /// Position across the whole unit, starting at 1.
    pub order: usize,
    /// Position inside the level, starting at 1.
    pub lesson_index: usize,
}

struct LessonPlacement<'a> {
    skill_id: &'a str,
    level_id: &'a str,
    order: usize,
    lesson_index: usize,
}

fn lesson_reference(lesson: &LessonRef, fallback_status: &str, placement: LessonPlacement<'_>) -> LessonReference {
    let default_title = format!("Lesson {}", placement.lesson_index);
    let (title, status, skill_id, level_id) = match lesson {
        LessonRef::Entry(entry) => (
            entry.title.clone().unwrap_or(default_title),
            entry.status.clone().unwrap_or_else(|| fallback_status.to_string()),
            entry.skill_id.clone().unwrap_or_else(|| placement.skill_id.to_string()),
            entry.level_id.clone().unwrap_or_else(|| placement.level_id.to_string()),
        ),
        _ => (
            default_title,
            fallback_status.to_string(),
            placement.skill_id.to_string(),
            placement.level_id.to_string(),
        ),
    };
    let lesson_type = lesson.lesson_type().map(str::to_string);
    LessonReference {
        id: lesson.id().to_string(),
        title,
        status,
        is_review: lesson_type.as_deref() == Some("review"),
        lesson_type,
        skill_id,
        level_id,
        order: placement.order,
        lesson_index: placement.lesson_index,
    }
}

/// Ordered lesson references of a unit. Direct `lessons` win over `skills`.
pub fn flatten_unit_lessons(unit: &IndexUnit) -> Vec<LessonReference> {
    let fallback_status = unit.status.as_deref().unwrap_or("locked");

    if !unit.lessons.is_empty() {
        return unit
            .lessons
            .iter()
            .enumerate()
            .map(|(index, lesson)| {
                let placement = LessonPlacement {
                    skill_id: "",
                    level_id: "",
                    order: index + 1,
                    lesson_index: index + 1,
                };
                lesson_reference(lesson, fallback_status, placement)
            })
            .collect();
    }

    let mut flattened = Vec::new();
    for skill in &unit.skills {
        for level in &skill.levels {
            for (index, lesson) in level.lessons.iter().enumerate() {
                let placement = LessonPlacement {
                    skill_id: skill.key(),
                    level_id: level.key(),
                    order: flattened.len() + 1,
                    lesson_index: index + 1,
                };
                flattened.push(lesson_reference(lesson, fallback_status, placement));
            }
        }
    }
    flattened
}

/// Completion summary of a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProgress {
    pub status: String,
    pub lessons_total: usize,
    pub lessons_completed: usize,
    pub lessons_unlocked: usize,
    pub progress: f64,
}

/// Derive a unit's status from its lessons: completed when every lesson is
/// completed, unlocked when a locked unit has any unlocked or completed lesson.
pub fn unit_progress(unit: &IndexUnit) -> UnitProgress {
    let lessons = flatten_unit_lessons(unit);
    let total = lessons.len();
    let completed = lessons.iter().filter(|l| l.status == "completed").count();
    let unlocked = lessons
        .iter()
        .filter(|l| l.status == "completed" || l.status == "unlocked")
        .count();

    let mut status = unit.status.clone().unwrap_or_else(|| "locked".to_string());
    if status != "locked" && total > 0 && completed >= total {
        status = "completed".to_string();
    } else if status == "locked" && unlocked > 0 {
        status = "unlocked".to_string();
    }

    UnitProgress {
        status,
        lessons_total: total,
        lessons_completed: completed,
        lessons_unlocked: unlocked,
        progress: if total > 0 {
            completed as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// `data/<unit-id>.lessons.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitLessonData {
    #[serde(default)]
    pub lessons: Vec<Value>,
}

impl UnitLessonData {
    pub fn find(&self, lesson_id: &str) -> Option<&Value> {
        self.lessons
            .iter()
            .find(|lesson| lesson.get("id").and_then(Value::as_str) == Some(lesson_id))
    }
}

/// Which lesson the learner is on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonQuery {
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub level_id: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
}

/// Position of a lesson inside its level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPosition {
    /// 1-based; 0 when the lesson could not be placed.
    pub current_index: usize,
    pub total_lessons: usize,
    pub lesson_id: String,
    pub lesson: Option<Value>,
    pub unit_id: Option<String>,
    pub section_id: Option<String>,
    pub skill_id: Option<String>,
    pub level_id: Option<String>,
    #[serde(rename = "type")]
    pub lesson_type: Option<String>,
    pub is_review: bool,
}

/// Locate a lesson: the named skill and level (else the first of each), the
/// named lesson (else the first). A declared `lessonCount` wins over the
/// listed lessons for the total.
pub fn lesson_position(
    index: &CourseIndex,
    details: Option<&UnitLessonData>,
    query: &LessonQuery,
) -> LessonPosition {
    let requested_lesson = query.lesson_id.clone().unwrap_or_default();
    let Some(unit_id) = query.unit_id.as_deref().filter(|id| !id.is_empty()) else {
        return LessonPosition::default();
    };
    let Some((section, unit)) = index.find_unit(unit_id) else {
        return LessonPosition {
            lesson_id: requested_lesson,
            ..LessonPosition::default()
        };
    };

    let mut position = LessonPosition {
        lesson_id: requested_lesson.clone(),
        unit_id: Some(unit.id.clone()),
        section_id: section.id.clone(),
        ..LessonPosition::default()
    };

    let named = |wanted: &Option<String>| wanted.clone().filter(|id| !id.is_empty());
    let skill = named(&query.skill_id)
        .and_then(|id| unit.skills.iter().find(|s| s.matches(&id)))
        .or_else(|| unit.skills.first());
    let Some(skill) = skill else {
        return position;
    };
    position.skill_id = Some(skill.key().to_string());

    let level = named(&query.level_id)
        .and_then(|id| skill.levels.iter().find(|l| l.matches(&id)))
        .or_else(|| skill.levels.first());
    let Some(level) = level else {
        return position;
    };
    position.level_id = Some(level.key().to_string());

    position.total_lessons = level
        .lesson_count
        .filter(|count| *count > 0)
        .map(|count| count as usize)
        .unwrap_or(level.lessons.len());

    let mut match_index = if requested_lesson.is_empty() {
        None
    } else {
        level.lessons.iter().position(|l| l.id() == requested_lesson)
    };
    if match_index.is_none() && !level.lessons.is_empty() {
        match_index = Some(0);
    }

    if let Some(found) = match_index {
        let lesson = &level.lessons[found];
        position.current_index = found + 1;
        position.lesson_id = lesson.id().to_string();
        position.lesson = details.and_then(|d| d.find(lesson.id())).cloned();
        position.lesson_type = position
            .lesson
            .as_ref()
            .and_then(|detail| detail.get("type"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .or(lesson.lesson_type())
            .map(str::to_string);
    }
    position.is_review = position.lesson_type.as_deref() == Some("review");
    position
}

/// "Lesson X of Y", or `None` when either side is unknown.
pub fn lesson_counter_text(position: &LessonPosition) -> Option<String> {
    (position.current_index > 0 && position.total_lessons > 0).then(|| {
        format!(
            "Lesson {} of {}",
            position.current_index, position.total_lessons
        )
    })
}

impl<F: ResourceFetcher> CourseLoader<F> {
    /// The lesson hierarchy index. Memoized after the first success.
    pub async fn load_course_index(&self) -> Result<Arc<CourseIndex>> {
        self.cache
            .course_index
            .get_or_load(COURSE_INDEX_PATH, || async {
                let index: CourseIndex = fetch_json(self.fetcher.as_ref(), COURSE_INDEX_PATH).await?;
                Ok::<_, CoreError>(Arc::new(index))
            })
            .await
    }

    /// Lesson details of a unit. Failures are logged and read as absent.
    pub async fn load_unit_lessons(&self, unit_id: &str) -> Option<Arc<UnitLessonData>> {
        let path = unit_lessons_path(unit_id);
        let loaded = self
            .cache
            .unit_lessons
            .get_or_load(&path, || async {
                let data: UnitLessonData = fetch_json(self.fetcher.as_ref(), &path).await?;
                Ok::<_, CoreError>(Arc::new(data))
            })
            .await;
        match loaded {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(unit = %unit_id, error = %e, "lesson details unavailable");
                None
            }
        }
    }

    /// Resolve where a lesson sits in its unit.
    pub async fn lesson_position(&self, query: &LessonQuery) -> Result<LessonPosition> {
        let Some(unit_id) = query.unit_id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(LessonPosition::default());
        };
        let index = self.load_course_index().await?;
        if index.find_unit(unit_id).is_none() {
            return Ok(lesson_position(&index, None, query));
        }
        let details = self.load_unit_lessons(unit_id).await;
        Ok(lesson_position(&index, details.as_deref(), query))
    }
}
