//! Error types for `mergeguard-engine`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("draft not found: {0}")]
  DraftNotFound(Uuid),

  #[error("match result not found: {0}")]
  MatchResultNotFound(Uuid),

  /// The requested decision is not one a reviewer may record.
  #[error("invalid decision: {0}")]
  InvalidDecision(String),

  /// Another duplicate check for this draft is still running.
  #[error("a duplicate check is already running for draft {0}")]
  ConcurrencyConflict(Uuid),

  #[error("record store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("name scan aborted: {0}")]
  ScanAborted(String),

  #[error("could not start scan workers: {0}")]
  WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
  /// Wrap a backend error without altering it.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single corpus record could not be scored. Never fatal to a scan.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
  #[error("corpus record {0} has no comparable name")]
  EmptyName(Uuid),

  #[error("similarity for corpus record {record_id} is not finite: {score}")]
  NonFinite { record_id: Uuid, score: f64 },
}
