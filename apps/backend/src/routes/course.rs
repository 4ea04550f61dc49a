//! Course hierarchy endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use lesson_core::lesson_counter_text;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/course
pub async fn hierarchy(State(state): State<AppState>) -> Result<Json<CourseResponse>> {
    let sections = state.content.sections().await?;
    Ok(Json(CourseResponse { sections }))
}

/// GET /api/units?sectionId=
pub async fn units(
    State(state): State<AppState>,
    Query(query): Query<UnitsQuery>,
) -> Result<Json<UnitsResponse>> {
    let units = state.content.units(query.section_id.as_deref()).await?;
    Ok(Json(UnitsResponse { units }))
}

/// GET /api/lessons/position?unitId=&skillId=&levelId=&lessonId=
pub async fn lesson_position(
    State(state): State<AppState>,
    Query(query): Query<LessonQuery>,
) -> Result<Json<LessonPositionResponse>> {
    let position = state.content.lesson_position(&query).await?;
    let counter = lesson_counter_text(&position);
    Ok(Json(LessonPositionResponse { position, counter }))
}
