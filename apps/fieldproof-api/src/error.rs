//! Error types for the FieldProof API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use assessment_engine::EngineError;

use crate::inference::InferenceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream inference response unusable: {0}")]
    UpstreamParse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reconciliation integrity fault: {0}")]
    Reconciliation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ApiError::UpstreamParse(msg) => {
                // Distinct from 500 so the client can offer "try again"
                tracing::warn!("Upstream parse failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_PARSE",
                    "Analysis service returned an unusable response".to_string(),
                )
            }
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{} not found", what))
            }
            ApiError::Reconciliation(msg) => {
                tracing::error!("Reconciliation mismatch: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RECONCILIATION_MISMATCH",
                    "Recheck could not be reconciled".to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Database error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => ApiError::InvalidRequest(msg),
            EngineError::UpstreamParse(msg) => ApiError::UpstreamParse(msg),
            EngineError::NotFound(what) => ApiError::NotFound(what),
            e @ EngineError::ReconciliationMismatch { .. } => {
                ApiError::Reconciliation(e.to_string())
            }
            EngineError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Parse(msg) => ApiError::UpstreamParse(msg),
            InferenceError::Transport(msg) => {
                ApiError::Internal(anyhow::anyhow!("inference transport failure: {}", msg))
            }
        }
    }
}
