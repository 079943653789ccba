//! HTTP server wiring for mergeguard.
//!
//! Puts the JSON API behind HTTP Basic authentication and request tracing.
//! The binary in `main.rs` owns configuration loading and startup.

pub mod auth;
pub mod error;
pub mod seed;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use mergeguard_core::store::RecordStore;
use mergeguard_engine::{DuplicateEngine, ScanConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MERGEGUARD_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// JSON file of drafts and corpus records loaded at startup.
  #[serde(default)]
  pub seed_path:          Option<PathBuf>,
  #[serde(default)]
  pub scan:               ScanConfig,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's axum [`Router`]: the API under `/api`, every route
/// authenticated.
pub fn router<S>(engine: DuplicateEngine<S>, credentials: Arc<AuthConfig>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .nest("/api", mergeguard_api::api_router(engine))
    .layer(middleware::from_fn_with_state(credentials, auth::require_basic))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use chrono::Utc;
  use mergeguard_core::{
    corpus::{CorpusRecord, CorpusStatus},
    draft::{Draft, DraftStatus, EntityCategory, RequestKind},
    matching::MatchResult,
  };
  use mergeguard_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  async fn app() -> (Router, Uuid) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let draft = Draft {
      draft_id:        Uuid::new_v4(),
      name:            "Fabrikam Industries".into(),
      request_kind:    RequestKind::Create,
      category:        EntityCategory::Both,
      origin:          "eu-sales".into(),
      status:          DraftStatus::Submitted,
      addresses:       vec![],
      tax_identifiers: vec![],
      classifications: BTreeSet::new(),
      created_at:      Utc::now(),
    };
    store.insert_draft(draft.clone()).await.unwrap();
    store
      .insert_corpus_record(CorpusRecord {
        record_id:              Uuid::new_v4(),
        name:                   "Fabrikam Industries GmbH".into(),
        status:                 CorpusStatus::Active,
        category:               EntityCategory::CustomerLike,
        established_identifier: None,
        origin:                 "eu-sales".into(),
        classifications:        BTreeSet::new(),
      })
      .await
      .unwrap();

    let engine = DuplicateEngine::new(Arc::new(store), ScanConfig::default()).unwrap();
    let auth = Arc::new(AuthConfig {
      username:      "user".to_string(),
      password_hash: auth::hash_password("secret").unwrap(),
    });
    (router(engine, auth), draft.draft_id)
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn request(method: &str, uri: &str, auth: Option<String>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
  }

  #[tokio::test]
  async fn unauthenticated_requests_are_challenged() {
    let (app, draft_id) = app().await;
    let resp = app
      .oneshot(request("GET", &format!("/api/drafts/{draft_id}"), None, ""))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      resp.headers()[header::WWW_AUTHENTICATE],
      "Basic realm=\"mergeguard\""
    );
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let (app, draft_id) = app().await;
    let auth = Some(basic("user", "nope"));
    let resp = app
      .oneshot(request("GET", &format!("/api/drafts/{draft_id}"), auth, ""))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_user_becomes_the_decider() {
    let (app, draft_id) = app().await;
    let auth = Some(basic("user", "secret"));

    let resp = app
      .clone()
      .oneshot(request(
        "POST",
        &format!("/api/drafts/{draft_id}/duplicate-check"),
        auth.clone(),
        "",
      ))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let results: Vec<MatchResult> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(results.len(), 1);

    let resp = app
      .oneshot(request(
        "POST",
        &format!("/api/matches/{}/decision", results[0].match_result_id),
        auth,
        r#"{"decision":"create_new"}"#,
      ))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let updated: MatchResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated.decision.decided_by.as_deref(), Some("user"));
  }
}
