//! Handlers for `/matches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/matches/{id}` | 404 if not found |
//! | `POST` | `/matches/{id}/decision` | Body: `{"decision":"merge","comment":"…"}`; needs a [`Decider`] |

use axum::{
  Extension, Json,
  extract::{Path, State},
};
use mergeguard_core::{
  matching::{Decision, MatchResult},
  parse_variant,
  store::RecordStore,
};
use mergeguard_engine::DuplicateEngine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{Decider, error::ApiError};

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /matches/{id}`
pub async fn get_one<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<MatchResult>, ApiError>
where
  S: RecordStore + 'static,
{
  Ok(Json(engine.match_result(id).await?))
}

// ─── Decide ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
  /// Kept as text so that unknown values surface as an invalid decision
  /// rather than a body rejection.
  pub decision: String,
  #[serde(default)]
  pub comment:  Option<String>,
}

/// `POST /matches/{id}/decision`
pub async fn decide<S>(
  State(engine): State<DuplicateEngine<S>>,
  Path(id): Path<Uuid>,
  decider: Option<Extension<Decider>>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<MatchResult>, ApiError>
where
  S: RecordStore + 'static,
{
  let Some(Extension(Decider(decider_id))) = decider else {
    return Err(ApiError::Unauthorized);
  };
  let decision: Decision = parse_variant("decision", body.decision.trim())
    .map_err(|e| ApiError::InvalidDecision(e.to_string()))?;

  let updated = engine
    .record_merge_decision(id, decision, &decider_id, body.comment)
    .await?;
  Ok(Json(updated))
}
