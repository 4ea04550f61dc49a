//! Exercise endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::content::check_answer;
use crate::AppState;

/// POST /api/exercises/:kind
pub async fn build(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<ExerciseRequest>,
) -> Result<Json<ExerciseConfig>> {
    let kind = ExerciseKind::from_slug(&kind)
        .ok_or_else(|| ApiError::NotFound(format!("exercise kind {kind}")))?;
    let config = state.content.build_exercise(kind, request).await?;
    Ok(Json(config))
}

/// POST /api/answers/check
pub async fn check(Json(request): Json<AnswerCheckRequest>) -> Result<Json<AnswerCheckResponse>> {
    let correct = check_answer(&request)?;
    Ok(Json(AnswerCheckResponse { correct }))
}
