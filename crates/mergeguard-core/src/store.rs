//! The `RecordStore` trait and the write bundle committed by a duplicate
//! check.
//!
//! The trait is implemented by storage backends (e.g.
//! `mergeguard-store-sqlite`). The engine and the API depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  audit::AuditEntry,
  corpus::CorpusRecord,
  draft::Draft,
  matching::{MatchResult, MergeDecision},
};

// ─── Write bundle ────────────────────────────────────────────────────────────

/// Everything one duplicate check writes, committed as a single unit.
#[derive(Debug, Clone)]
pub struct ReviewCommit {
  pub draft_id:   Uuid,
  /// Replaces every match result currently stored for `draft_id`.
  pub results:    Vec<MatchResult>,
  /// When present, the draft's status is set to `transition.new_status` and
  /// the entry is appended to the audit trail.
  pub transition: Option<AuditEntry>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a mergeguard record store backend.
///
/// Corpus reads never mutate state. [`RecordStore::commit_review`] must be
/// atomic: either the whole bundle is visible afterwards or none of it is.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Intake ────────────────────────────────────────────────────────────

  /// Persist a draft, replacing any draft with the same id.
  fn insert_draft(
    &self,
    draft: Draft,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist a corpus record, replacing any record with the same id.
  fn insert_corpus_record(
    &self,
    record: CorpusRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a draft by id. Returns `None` if not found.
  fn get_draft(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Draft>, Self::Error>> + Send + '_;

  /// Every corpus record whose status is `Active`.
  fn active_corpus_records(
    &self,
  ) -> impl Future<Output = Result<Vec<CorpusRecord>, Self::Error>> + Send + '_;

  /// Corpus records of any status whose established identifier equals
  /// `value` issued by `jurisdiction`.
  fn find_corpus_by_established_identifier<'a>(
    &'a self,
    jurisdiction: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<Vec<CorpusRecord>, Self::Error>> + Send + 'a;

  /// Retrieve one match result. Returns `None` if not found.
  fn get_match_result(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<MatchResult>, Self::Error>> + Send + '_;

  /// Match results for a draft, in rank order.
  fn list_match_results(
    &self,
    draft_id: Uuid,
  ) -> impl Future<Output = Result<Vec<MatchResult>, Self::Error>> + Send + '_;

  /// Audit entries for a draft, oldest first.
  fn list_audit_entries(
    &self,
    draft_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AuditEntry>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Atomically replace a draft's match results and, if requested, apply a
  /// status transition with its audit entry.
  fn commit_review(
    &self,
    commit: ReviewCommit,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite the decision fields of one match result and return the
  /// updated row. Returns `None` if the result does not exist.
  fn record_decision(
    &self,
    id: Uuid,
    decision: MergeDecision,
  ) -> impl Future<Output = Result<Option<MatchResult>, Self::Error>> + Send + '_;
}
