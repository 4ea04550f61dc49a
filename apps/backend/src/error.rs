//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lesson_core::{ConfigurationError, CoreError, LoadError, ResolutionError};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Content unavailable: {0}")]
    Load(#[from] LoadError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Configuration(e) => Self::Configuration(e),
            CoreError::Resolution(e) => Self::Resolution(e),
            CoreError::Load(e) => Self::Load(e),
            CoreError::Parse(e) => Self::Internal(e.to_string()),
            CoreError::Session(e) => Self::BadRequest(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Configuration(_) => (StatusCode::UNPROCESSABLE_ENTITY, "configuration_error"),
            ApiError::Resolution(_) => (StatusCode::NOT_FOUND, "resolution_error"),
            ApiError::Load(_) => (StatusCode::BAD_GATEWAY, "content_unavailable"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_status() {
        let error = ApiError::Configuration(ConfigurationError::NoTurns);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_resolution_status() {
        let error: ApiError = CoreError::from(ResolutionError::ContextUnavailable).into();
        assert!(matches!(error, ApiError::Resolution(_)));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_load_status() {
        let error: ApiError = CoreError::from(LoadError::Timeout {
            path: "course.map.json".to_string(),
            millis: 50,
        })
        .into();
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("missing config".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("unexpected error".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_configuration() {
        let error = ApiError::Configuration(ConfigurationError::InsufficientVocabulary {
            exercise: "MatchPairs",
            required: 2,
            found: 1,
        });
        assert_eq!(
            error.to_string(),
            "Configuration error: MatchPairs requires at least 2 distinct vocab entries, found 1"
        );
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("unit-09".to_string());
        assert_eq!(error.to_string(), "Not found: unit-09");
    }
}
