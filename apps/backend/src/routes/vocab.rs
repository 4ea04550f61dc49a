//! Vocabulary resolution endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/vocab/resolve
pub async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveVocabRequest>,
) -> Result<Json<ResolveVocabResponse>> {
    let (vocab, context) = state
        .content
        .resolve_vocab(request.context, request.side)
        .await?;
    Ok(Json(ResolveVocabResponse { vocab, context }))
}

/// POST /api/vocab/batch
pub async fn batch(
    State(state): State<AppState>,
    Json(request): Json<BatchVocabRequest>,
) -> Result<Json<VocabListResponse>> {
    let vocab = state
        .content
        .batch_vocab(request.context, request.count)
        .await?;
    Ok(Json(VocabListResponse { vocab }))
}
