//! Error type for `mergeguard-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] mergeguard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored score fell outside `[0, 1]`.
  #[error("score out of range: {0}")]
  ScoreOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
