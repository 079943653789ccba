//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use chrono::Utc;
use mergeguard_core::{
  audit::{AuditAction, AuditEntry},
  corpus::{CorpusRecord, CorpusStatus, EstablishedIdentifier},
  draft::{
    Address, AddressKind, Draft, DraftStatus, EntityCategory, RequestKind,
    TaxIdentifier,
  },
  matching::{
    Decision, MatchConfidence, MatchMethod, MatchResult, MergeCompatibility,
    MergeDecision, MergeRisk,
  },
  store::{RecordStore, ReviewCommit},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn draft(name: &str) -> Draft {
  Draft {
    draft_id:        Uuid::new_v4(),
    name:            name.into(),
    request_kind:    RequestKind::Create,
    category:        EntityCategory::SupplierLike,
    origin:          "emea-procurement".into(),
    status:          DraftStatus::Submitted,
    addresses:       vec![Address {
      kind:         AddressKind::Established,
      street:       Some("1 Main St".into()),
      locality:     Some("Springfield".into()),
      jurisdiction: "US".into(),
    }],
    tax_identifiers: vec![TaxIdentifier {
      jurisdiction: "US".into(),
      value:        "US987654321".into(),
    }],
    classifications: BTreeSet::from(["raw-materials".to_owned()]),
    created_at:      Utc::now(),
  }
}

fn record(name: &str, status: CorpusStatus, identifier: Option<(&str, &str)>) -> CorpusRecord {
  CorpusRecord {
    record_id:              Uuid::new_v4(),
    name:                   name.into(),
    status,
    category:               EntityCategory::SupplierLike,
    established_identifier: identifier.map(|(j, v)| EstablishedIdentifier {
      jurisdiction: j.into(),
      value:        v.into(),
    }),
    origin:                 "emea-procurement".into(),
    classifications:        BTreeSet::from(["raw-materials".to_owned()]),
  }
}

fn result(draft_id: Uuid, rec: &CorpusRecord, score: f64, rank: u32) -> MatchResult {
  MatchResult {
    match_result_id:  MatchResult::id_for(draft_id, rec.record_id),
    draft_id,
    corpus_record_id: rec.record_id,
    corpus_name:      rec.name.clone(),
    methods:          BTreeSet::from([MatchMethod::FuzzyName]),
    score,
    confidence:       MatchConfidence::High,
    explanation:      "name similarity".into(),
    compatibility:    MergeCompatibility {
      can_merge:           true,
      risk:                MergeRisk::Low,
      recommendation:      "excellent candidate".into(),
      compatibility_score: 100,
      notes:               vec!["strong candidate: same origin".into()],
    },
    review_required:  score > 0.8,
    rank,
    decision:         MergeDecision::pending(),
  }
}

fn audit(d: &Draft) -> AuditEntry {
  AuditEntry {
    audit_id:         Uuid::new_v4(),
    draft_id:         d.draft_id,
    action:           AuditAction::DuplicateReviewRequested,
    prior_status:     DraftStatus::Submitted,
    new_status:       DraftStatus::PendingDuplicateReview,
    comment:          "1 potential duplicate(s) found".into(),
    system_generated: true,
    recorded_at:      Utc::now(),
  }
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_draft() {
  let s = store().await;
  let d = draft("ACME Corporation Ltd");
  s.insert_draft(d.clone()).await.unwrap();

  let fetched = s.get_draft(d.draft_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, d.name);
  assert_eq!(fetched.status, DraftStatus::Submitted);
  assert_eq!(fetched.addresses, d.addresses);
  assert_eq!(fetched.tax_identifiers, d.tax_identifiers);
}

#[tokio::test]
async fn get_draft_missing_returns_none() {
  let s = store().await;
  assert!(s.get_draft(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_draft_twice_updates_in_place() {
  let s = store().await;
  let mut d = draft("ACME");
  s.insert_draft(d.clone()).await.unwrap();
  d.name = "ACME Widgets".into();
  s.insert_draft(d.clone()).await.unwrap();

  let fetched = s.get_draft(d.draft_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "ACME Widgets");
}

// ─── Corpus ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn active_corpus_excludes_other_statuses() {
  let s = store().await;
  s.insert_corpus_record(record("A", CorpusStatus::Active, None)).await.unwrap();
  s.insert_corpus_record(record("B", CorpusStatus::Blocked, None)).await.unwrap();
  s.insert_corpus_record(record("C", CorpusStatus::Archived, None)).await.unwrap();

  let active = s.active_corpus_records().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "A");
}

#[tokio::test]
async fn find_by_identifier_matches_any_status_and_ignores_jurisdiction_case() {
  let s = store().await;
  let blocked = record("Blocked Co", CorpusStatus::Blocked, Some(("US", "US987654321")));
  s.insert_corpus_record(blocked.clone()).await.unwrap();
  s.insert_corpus_record(record("Other", CorpusStatus::Active, Some(("DE", "US987654321"))))
    .await
    .unwrap();

  let hits = s
    .find_corpus_by_established_identifier("us", "US987654321")
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].record_id, blocked.record_id);
  assert_eq!(hits[0].classifications, blocked.classifications);
}

// ─── Review commits ──────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_review_replaces_previous_results() {
  let s = store().await;
  let d = draft("ACME");
  let a = record("ACME A", CorpusStatus::Active, None);
  let b = record("ACME B", CorpusStatus::Active, None);
  s.insert_draft(d.clone()).await.unwrap();
  s.insert_corpus_record(a.clone()).await.unwrap();
  s.insert_corpus_record(b.clone()).await.unwrap();

  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![result(d.draft_id, &a, 0.97, 0), result(d.draft_id, &b, 0.96, 1)],
    transition: None,
  })
  .await
  .unwrap();

  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![result(d.draft_id, &b, 0.99, 0)],
    transition: None,
  })
  .await
  .unwrap();

  let stored = s.list_match_results(d.draft_id).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].corpus_record_id, b.record_id);
  assert_eq!(stored[0].score, 0.99);
}

#[tokio::test]
async fn commit_review_round_trips_results_in_rank_order() {
  let s = store().await;
  let d = draft("ACME");
  let a = record("ACME A", CorpusStatus::Active, None);
  let b = record("ACME B", CorpusStatus::Active, None);
  s.insert_draft(d.clone()).await.unwrap();
  s.insert_corpus_record(a.clone()).await.unwrap();
  s.insert_corpus_record(b.clone()).await.unwrap();

  let expected = vec![result(d.draft_id, &b, 0.99, 0), result(d.draft_id, &a, 0.96, 1)];
  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![expected[1].clone(), expected[0].clone()],
    transition: None,
  })
  .await
  .unwrap();

  let stored = s.list_match_results(d.draft_id).await.unwrap();
  assert_eq!(stored, expected);
}

#[tokio::test]
async fn commit_review_applies_transition_and_audit() {
  let s = store().await;
  let d = draft("ACME");
  s.insert_draft(d.clone()).await.unwrap();

  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![],
    transition: Some(audit(&d)),
  })
  .await
  .unwrap();

  let fetched = s.get_draft(d.draft_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, DraftStatus::PendingDuplicateReview);

  let trail = s.list_audit_entries(d.draft_id).await.unwrap();
  assert_eq!(trail.len(), 1);
  assert_eq!(trail[0].action, AuditAction::DuplicateReviewRequested);
  assert!(trail[0].system_generated);
}

#[tokio::test]
async fn failed_commit_leaves_previous_results_untouched() {
  let s = store().await;
  let d = draft("ACME");
  let a = record("ACME A", CorpusStatus::Active, None);
  s.insert_draft(d.clone()).await.unwrap();
  s.insert_corpus_record(a.clone()).await.unwrap();

  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![result(d.draft_id, &a, 0.97, 0)],
    transition: None,
  })
  .await
  .unwrap();

  // The second row references a corpus record that does not exist, so the
  // foreign key check fails after the delete has already run.
  let ghost = record("Ghost", CorpusStatus::Active, None);
  let outcome = s
    .commit_review(ReviewCommit {
      draft_id:   d.draft_id,
      results:    vec![result(d.draft_id, &a, 0.99, 0), result(d.draft_id, &ghost, 0.98, 1)],
      transition: Some(audit(&d)),
    })
    .await;
  assert!(outcome.is_err());

  let stored = s.list_match_results(d.draft_id).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].score, 0.97);
  let fetched = s.get_draft(d.draft_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, DraftStatus::Submitted);
  assert!(s.list_audit_entries(d.draft_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_score_is_rejected_before_writing() {
  let s = store().await;
  let d = draft("ACME");
  let a = record("ACME A", CorpusStatus::Active, None);
  s.insert_draft(d.clone()).await.unwrap();
  s.insert_corpus_record(a.clone()).await.unwrap();

  let outcome = s
    .commit_review(ReviewCommit {
      draft_id:   d.draft_id,
      results:    vec![result(d.draft_id, &a, 1.5, 0)],
      transition: None,
    })
    .await;
  assert!(matches!(outcome, Err(crate::Error::ScoreOutOfRange(_))));
}

// ─── Decisions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_decision_updates_only_decision_fields() {
  let s = store().await;
  let d = draft("ACME");
  let a = record("ACME A", CorpusStatus::Active, None);
  s.insert_draft(d.clone()).await.unwrap();
  s.insert_corpus_record(a.clone()).await.unwrap();
  let original = result(d.draft_id, &a, 0.97, 0);
  s.commit_review(ReviewCommit {
    draft_id:   d.draft_id,
    results:    vec![original.clone()],
    transition: None,
  })
  .await
  .unwrap();

  let decided_at = Utc::now();
  let updated = s
    .record_decision(original.match_result_id, MergeDecision {
      decision:   Decision::Merge,
      decided_by: Some("reviewer-7".into()),
      decided_at: Some(decided_at),
      comment:    Some("same VAT number".into()),
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.decision.decision, Decision::Merge);
  assert_eq!(updated.decision.decided_by.as_deref(), Some("reviewer-7"));
  assert_eq!(
    updated.decision.decided_at.map(|t| t.timestamp_micros()),
    Some(decided_at.timestamp_micros())
  );
  assert_eq!(updated.score, original.score);
  assert_eq!(updated.compatibility, original.compatibility);

  let fetched = s.get_draft(d.draft_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, DraftStatus::Submitted);
}

#[tokio::test]
async fn record_decision_on_missing_result_returns_none() {
  let s = store().await;
  let outcome = s
    .record_decision(Uuid::new_v4(), MergeDecision::pending())
    .await
    .unwrap();
  assert!(outcome.is_none());
}
