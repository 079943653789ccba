//! Folding candidates from every matcher into one ranked result list.

use std::collections::{BTreeMap, BTreeSet};

use mergeguard_core::{
  corpus::CorpusRecord,
  draft::Draft,
  matching::{MatchConfidence, MatchMethod, MatchResult, MergeDecision},
};
use uuid::Uuid;

use crate::{candidate::MatchCandidate, compatibility, review};

/// Confidence tier for a score. Total over all inputs.
pub fn confidence_for(score: f64) -> MatchConfidence {
  match score {
    s if s >= 0.98 => MatchConfidence::VeryHigh,
    s if s >= 0.95 => MatchConfidence::High,
    s if s >= 0.90 => MatchConfidence::Medium,
    s if s >= 0.80 => MatchConfidence::Low,
    _ => MatchConfidence::VeryLow,
  }
}

/// Everything known about one corpus record while consolidating.
struct Group {
  record:  CorpusRecord,
  /// Best score and its explanation, per method.
  methods: BTreeMap<MatchMethod, (f64, String)>,
}

/// Join candidates on corpus record id and rank the merged entries.
///
/// Per record: the score is the maximum over contributing candidates, the
/// method set is their union, and the explanation concatenates one
/// explanation per method. Each entry is scored for merge compatibility
/// against `draft`. The list is ordered by score, then compatibility score,
/// both descending, then by record id so that equal entries have a fixed
/// order.
pub fn consolidate(draft: &Draft, candidates: Vec<MatchCandidate>) -> Vec<MatchResult> {
  let mut groups: BTreeMap<Uuid, Group> = BTreeMap::new();

  for candidate in candidates {
    let group = groups
      .entry(candidate.record_id())
      .or_insert_with(|| Group {
        record:  candidate.record.clone(),
        methods: BTreeMap::new(),
      });
    let entry = group
      .methods
      .entry(candidate.method)
      .or_insert((candidate.score, candidate.explanation.clone()));
    if candidate.score > entry.0 {
      *entry = (candidate.score, candidate.explanation);
    }
  }

  let mut results: Vec<MatchResult> = groups
    .into_values()
    .map(|group| {
      let score = group
        .methods
        .values()
        .map(|(s, _)| *s)
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 1.0);
      let methods: BTreeSet<MatchMethod> = group.methods.keys().copied().collect();
      let explanation = group
        .methods
        .values()
        .map(|(_, e)| e.as_str())
        .collect::<Vec<_>>()
        .join("; ");

      MatchResult {
        match_result_id: MatchResult::id_for(draft.draft_id, group.record.record_id),
        draft_id: draft.draft_id,
        corpus_record_id: group.record.record_id,
        corpus_name: group.record.name.clone(),
        methods,
        score,
        confidence: confidence_for(score),
        explanation,
        compatibility: compatibility::analyze(draft, &group.record),
        review_required: review::review_required(score),
        rank: 0,
        decision: MergeDecision::pending(),
      }
    })
    .collect();

  results.sort_by(|a, b| {
    b.score
      .total_cmp(&a.score)
      .then_with(|| {
        b.compatibility
          .compatibility_score
          .cmp(&a.compatibility.compatibility_score)
      })
      .then_with(|| a.corpus_record_id.cmp(&b.corpus_record_id))
  });
  for (rank, result) in results.iter_mut().enumerate() {
    result.rank = rank as u32;
  }
  results
}
