//! Handlers for `/drafts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/drafts/{id}` | 404 if not found |
//! | `POST` | `/drafts/{id}/duplicate-check` | Runs a check; 409 while one is running |
//! | `GET`  | `/drafts/{id}/matches` | Rank order; `ETag`, honours `If-None-Match` |
//! | `GET`  | `/drafts/{id}/audit` | Oldest first |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use mergeguard_core::{
  audit::AuditEntry, draft::Draft, matching::MatchResult, store::RecordStore,
};
use mergeguard_engine::DuplicateEngine;
use uuid::Uuid;

use crate::{error::ApiError, etag::compute_etag};

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /drafts/{id}`
pub async fn get_one<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Draft>, ApiError>
where
  S: RecordStore + 'static,
{
  Ok(Json(engine.draft(id).await?))
}

// ─── Duplicate check ──────────────────────────────────────────────────────────

/// `POST /drafts/{id}/duplicate-check`
pub async fn check<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchResult>>, ApiError>
where
  S: RecordStore + 'static,
{
  Ok(Json(engine.check_duplicates(id).await?))
}

// ─── Results ──────────────────────────────────────────────────────────────────

/// `GET /drafts/{id}/matches`
pub async fn matches<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: RecordStore + 'static,
{
  let results = engine.match_results(id).await?;
  let etag = compute_etag(&results).map_err(|e| ApiError::Internal(e.to_string()))?;
  let etag_value =
    HeaderValue::from_str(&etag).map_err(|e| ApiError::Internal(e.to_string()))?;

  let unchanged = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag));
  if unchanged {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
  }

  Ok(([(header::ETAG, etag_value)], Json(results)).into_response())
}

// ─── Audit ────────────────────────────────────────────────────────────────────

/// `GET /drafts/{id}/audit`
pub async fn audit<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuditEntry>>, ApiError>
where
  S: RecordStore + 'static,
{
  Ok(Json(engine.audit_entries(id).await?))
}
