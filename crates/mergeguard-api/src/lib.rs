//! JSON REST API for mergeguard.
//!
//! Exposes an axum [`Router`] over a [`DuplicateEngine`] backed by any
//! [`RecordStore`]. Authentication is the caller's responsibility: routes
//! that record a decision expect a [`Decider`] request extension naming the
//! authenticated reviewer, and answer `401` without one.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mergeguard_api::api_router(engine.clone()))
//! ```

pub mod drafts;
pub mod error;
pub mod etag;
pub mod matches;

use axum::{
  Router,
  routing::{get, post},
};
use mergeguard_core::store::RecordStore;
use mergeguard_engine::DuplicateEngine;

pub use error::ApiError;

/// Identity of the reviewer behind a request, inserted by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decider(pub String);

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(engine: DuplicateEngine<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Drafts
    .route("/drafts/{id}", get(drafts::get_one::<S>))
    .route("/drafts/{id}/duplicate-check", post(drafts::check::<S>))
    .route("/drafts/{id}/matches", get(drafts::matches::<S>))
    .route("/drafts/{id}/audit", get(drafts::audit::<S>))
    // Match results
    .route("/matches/{id}", get(matches::get_one::<S>))
    .route("/matches/{id}/decision", post(matches::decide::<S>))
    .with_state(engine)
}
