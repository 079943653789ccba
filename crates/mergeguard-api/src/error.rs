//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use mergeguard_engine::Error as EngineError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid decision: {0}")]
  InvalidDecision(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("no authenticated decider")]
  Unauthorized,

  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<EngineError> for ApiError {
  fn from(err: EngineError) -> Self {
    match err {
      EngineError::DraftNotFound(_) | EngineError::MatchResultNotFound(_) => {
        ApiError::NotFound(err.to_string())
      }
      EngineError::InvalidDecision(m) => ApiError::InvalidDecision(m),
      EngineError::ConcurrencyConflict(_) => ApiError::Conflict(err.to_string()),
      EngineError::StoreUnavailable(e) => {
        tracing::error!(error = %e, "record store failed");
        ApiError::Unavailable(e.to_string())
      }
      EngineError::ScanAborted(_) | EngineError::WorkerPool(_) => {
        tracing::error!(error = %err, "duplicate check failed");
        ApiError::Internal(err.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::InvalidDecision(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
