pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use lesson_core::{ContentFetcher, ExerciseSettings};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::models::HealthResponse;
use crate::services::content::ContentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService<ContentFetcher>>,
}

impl AppState {
    pub fn new(fetcher: ContentFetcher, settings: ExerciseSettings) -> Self {
        Self {
            content: Arc::new(ContentService::new(fetcher, settings)),
        }
    }
}

/// All API routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/course", get(routes::course::hierarchy))
        .route("/api/units", get(routes::course::units))
        .route("/api/lessons/position", get(routes::course::lesson_position))
        .route("/api/vocab/resolve", post(routes::vocab::resolve))
        .route("/api/vocab/batch", post(routes::vocab::batch))
        .route("/api/exercises/:kind", post(routes::exercises::build))
        .route("/api/answers/check", post(routes::exercises::check))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    match &config.content_base_url {
        Some(url) => tracing::info!(url = %url, "serving content over HTTP"),
        None => tracing::info!(root = %config.content_root.display(), "serving content from disk"),
    }

    let state = AppState::new(config.fetcher(), config.settings.clone());
    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
