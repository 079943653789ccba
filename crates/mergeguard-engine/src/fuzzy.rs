//! Near-duplicate name scan over the active corpus.

use mergeguard_core::{corpus::CorpusRecord, matching::MatchMethod};
use rayon::prelude::*;

use crate::{
  candidate::MatchCandidate,
  error::ScoreError,
  similarity::{MATCH_THRESHOLD, similarity},
};

/// Score one record against an already-normalised draft name.
///
/// Returns `Ok(None)` for records that are not `Active` or score below
/// [`MATCH_THRESHOLD`].
pub fn score_record(
  draft_name: &str,
  record: &CorpusRecord,
) -> Result<Option<MatchCandidate>, ScoreError> {
  if !record.status.is_active() {
    return Ok(None);
  }

  let record_name = crate::normalize::normalize(&record.name);
  if record_name.is_empty() {
    return Err(ScoreError::EmptyName(record.record_id));
  }

  let score = similarity(draft_name, &record_name);
  if !score.is_finite() {
    return Err(ScoreError::NonFinite { record_id: record.record_id, score });
  }
  if score < MATCH_THRESHOLD {
    return Ok(None);
  }

  Ok(Some(MatchCandidate {
    record:      record.clone(),
    method:      MatchMethod::FuzzyName,
    score,
    explanation: format!(
      "name similarity {:.1}% ({draft_name:?} vs {record_name:?})",
      score * 100.0
    ),
  }))
}

/// Keep the candidate, or log why the record was skipped.
fn keep(outcome: Result<Option<MatchCandidate>, ScoreError>) -> Option<MatchCandidate> {
  match outcome {
    Ok(candidate) => candidate,
    Err(err) => {
      tracing::warn!(error = %err, "skipping corpus record");
      None
    }
  }
}

/// Score `records` one after another on the calling thread.
pub fn scan(draft_name: &str, records: &[CorpusRecord]) -> Vec<MatchCandidate> {
  if draft_name.is_empty() {
    tracing::warn!("draft name normalises to nothing; fuzzy scan skipped");
    return Vec::new();
  }
  records
    .iter()
    .filter_map(|r| keep(score_record(draft_name, r)))
    .collect()
}

/// Score `records` across the current rayon pool.
///
/// Each record is scored independently, so the result set is the same as
/// [`scan`]; callers must not rely on its order.
pub fn par_scan(draft_name: &str, records: &[CorpusRecord]) -> Vec<MatchCandidate> {
  if draft_name.is_empty() {
    tracing::warn!("draft name normalises to nothing; fuzzy scan skipped");
    return Vec::new();
  }
  records
    .par_iter()
    .filter_map(|r| keep(score_record(draft_name, r)))
    .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use mergeguard_core::{corpus::CorpusStatus, draft::EntityCategory};
  use uuid::Uuid;

  use super::*;

  fn record(name: &str, status: CorpusStatus) -> CorpusRecord {
    CorpusRecord {
      record_id:              Uuid::new_v4(),
      name:                   name.into(),
      status,
      category:               EntityCategory::Both,
      established_identifier: None,
      origin:                 "test".into(),
      classifications:        BTreeSet::new(),
    }
  }

  #[test]
  fn keeps_only_matches_at_or_above_threshold() {
    let records = vec![
      record("Northwind Trading Partner Ltd", CorpusStatus::Active),
      record("Southwind Logistics", CorpusStatus::Active),
    ];
    let found = scan("northwind trading partners", &records);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].record_id(), records[0].record_id);
    assert_eq!(found[0].method, MatchMethod::FuzzyName);
    assert!(found[0].score >= MATCH_THRESHOLD);
  }

  #[test]
  fn inactive_records_are_never_scanned() {
    let records = vec![record("Northwind Trading Partners", CorpusStatus::Blocked)];
    assert!(scan("northwind trading partners", &records).is_empty());
  }

  #[test]
  fn unscoreable_record_is_skipped_without_aborting() {
    let records = vec![
      record("Ltd.", CorpusStatus::Active),
      record("Northwind Trading Partners", CorpusStatus::Active),
    ];
    assert_eq!(
      score_record("northwind trading partners", &records[0]),
      Err(ScoreError::EmptyName(records[0].record_id))
    );
    let found = scan("northwind trading partners", &records);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].score, 1.0);
  }

  #[test]
  fn empty_draft_name_matches_nothing() {
    let records = vec![record("Northwind", CorpusStatus::Active)];
    assert!(scan("", &records).is_empty());
  }

  #[test]
  fn parallel_scan_finds_the_same_set() {
    let mut records: Vec<_> = (0..200)
      .map(|i| record(&format!("Vendor Number {i:04}"), CorpusStatus::Active))
      .collect();
    records.push(record("Northwind Trading Partners", CorpusStatus::Active));
    records.push(record("Northwind Trading Partner", CorpusStatus::Active));

    let ids = |found: Vec<MatchCandidate>| -> BTreeSet<Uuid> {
      found.iter().map(MatchCandidate::record_id).collect()
    };
    let serial = ids(scan("northwind trading partners", &records));
    let parallel = ids(par_scan("northwind trading partners", &records));
    assert_eq!(serial.len(), 2);
    assert_eq!(serial, parallel);
  }
}
