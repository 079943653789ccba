//! The duplicate-check orchestrator.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex, PoisonError},
};

use chrono::Utc;
use mergeguard_core::{
  audit::AuditEntry,
  corpus::CorpusRecord,
  draft::Draft,
  matching::{Decision, MatchResult, MergeDecision},
  store::{RecordStore, ReviewCommit},
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use uuid::Uuid;

use crate::{
  candidate::MatchCandidate,
  config::ScanConfig,
  consolidate::consolidate,
  error::{Error, Result},
  fuzzy, identifier,
  normalize::normalize,
  review,
};

// ─── In-flight guard ─────────────────────────────────────────────────────────

type InFlight = Arc<Mutex<HashSet<Uuid>>>;

/// Marks a draft as being checked until dropped.
pub(crate) struct RunGuard {
  draft_id:  Uuid,
  in_flight: InFlight,
}

impl Drop for RunGuard {
  fn drop(&mut self) {
    self
      .in_flight
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&self.draft_id);
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Runs duplicate checks and records reviewer decisions against a
/// [`RecordStore`].
///
/// Cloning is cheap; clones share the store, the scan workers and the set of
/// drafts currently being checked.
pub struct DuplicateEngine<S> {
  store:     Arc<S>,
  config:    ScanConfig,
  pool:      Arc<ThreadPool>,
  in_flight: InFlight,
}

impl<S> Clone for DuplicateEngine<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      config:    self.config.clone(),
      pool:      Arc::clone(&self.pool),
      in_flight: Arc::clone(&self.in_flight),
    }
  }
}

impl<S> DuplicateEngine<S>
where
  S: RecordStore + 'static,
{
  /// Build an engine over `store`, starting `config.max_workers` scan
  /// threads.
  pub fn new(store: Arc<S>, config: ScanConfig) -> Result<Self> {
    let pool = ThreadPoolBuilder::new()
      .num_threads(config.max_workers.max(1))
      .thread_name(|i| format!("mergeguard-scan-{i}"))
      .build()?;
    Ok(Self {
      store,
      config,
      pool: Arc::new(pool),
      in_flight: Arc::default(),
    })
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub(crate) fn begin_run(&self, draft_id: Uuid) -> Result<RunGuard> {
    let mut running = self
      .in_flight
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    if !running.insert(draft_id) {
      return Err(Error::ConcurrencyConflict(draft_id));
    }
    Ok(RunGuard { draft_id, in_flight: Arc::clone(&self.in_flight) })
  }

  // ── CheckDuplicates ───────────────────────────────────────────────────

  /// Check a draft against the corpus and persist the outcome.
  ///
  /// Replaces every match result previously stored for the draft. When the
  /// results call for it, the draft moves to `PendingDuplicateReview` and an
  /// audit entry is appended; both happen in the same store transaction as
  /// the replacement. The returned list is exactly what was persisted, in
  /// rank order.
  pub async fn check_duplicates(&self, draft_id: Uuid) -> Result<Vec<MatchResult>> {
    let _guard = self.begin_run(draft_id)?;

    let draft = self
      .store
      .get_draft(draft_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DraftNotFound(draft_id))?;

    let mut candidates = identifier::find_candidates(self.store.as_ref(), &draft)
      .await
      .map_err(Error::store)?;
    let corpus = self.store.active_corpus_records().await.map_err(Error::store)?;
    candidates.extend(self.scan_names(&draft, corpus).await?);

    let results = consolidate(&draft, candidates);
    let transition = review::plan_transition(&draft, &results, Utc::now());
    let transitioned = transition.is_some();

    self
      .store
      .commit_review(ReviewCommit {
        draft_id,
        results: results.clone(),
        transition,
      })
      .await
      .map_err(Error::store)?;

    tracing::info!(
      %draft_id,
      matches = results.len(),
      transitioned,
      "duplicate check finished",
    );
    Ok(results)
  }

  /// Score the corpus by name, inline for small corpora and on the scan
  /// workers otherwise.
  async fn scan_names(
    &self,
    draft: &Draft,
    corpus: Vec<CorpusRecord>,
  ) -> Result<Vec<MatchCandidate>> {
    let name = normalize(&draft.name);
    if corpus.len() < self.config.parallel_threshold {
      return Ok(fuzzy::scan(&name, &corpus));
    }

    tracing::debug!(
      draft_id = %draft.draft_id,
      records = corpus.len(),
      "scanning corpus on worker pool",
    );
    let pool = Arc::clone(&self.pool);
    tokio::task::spawn_blocking(move || {
      pool.install(|| fuzzy::par_scan(&name, &corpus))
    })
    .await
    .map_err(|e| Error::ScanAborted(e.to_string()))
  }

  // ── RecordMergeDecision ───────────────────────────────────────────────

  /// Record a reviewer's decision on one match result.
  ///
  /// Only the decision fields change; the draft's status is untouched.
  pub async fn record_merge_decision(
    &self,
    match_result_id: Uuid,
    decision: Decision,
    decider_id: &str,
    comment: Option<String>,
  ) -> Result<MatchResult> {
    if decision == Decision::Pending {
      return Err(Error::InvalidDecision(
        "pending is not a decision a reviewer can record".into(),
      ));
    }
    let decider_id = decider_id.trim();
    if decider_id.is_empty() {
      return Err(Error::InvalidDecision("decider id is empty".into()));
    }

    let updated = self
      .store
      .record_decision(match_result_id, MergeDecision {
        decision,
        decided_by: Some(decider_id.to_owned()),
        decided_at: Some(Utc::now()),
        comment,
      })
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchResultNotFound(match_result_id))?;

    tracing::info!(
      %match_result_id,
      draft_id = %updated.draft_id,
      %decision,
      decider_id,
      "merge decision recorded",
    );
    Ok(updated)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn draft(&self, draft_id: Uuid) -> Result<Draft> {
    self
      .store
      .get_draft(draft_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DraftNotFound(draft_id))
  }

  /// The persisted results of the last check for a draft, in rank order.
  pub async fn match_results(&self, draft_id: Uuid) -> Result<Vec<MatchResult>> {
    self.draft(draft_id).await?;
    self
      .store
      .list_match_results(draft_id)
      .await
      .map_err(Error::store)
  }

  pub async fn match_result(&self, match_result_id: Uuid) -> Result<MatchResult> {
    self
      .store
      .get_match_result(match_result_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchResultNotFound(match_result_id))
  }

  pub async fn audit_entries(&self, draft_id: Uuid) -> Result<Vec<AuditEntry>> {
    self.draft(draft_id).await?;
    self
      .store
      .list_audit_entries(draft_id)
      .await
      .map_err(Error::store)
  }
}
