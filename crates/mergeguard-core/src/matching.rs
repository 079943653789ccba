//! Persisted match results and the verdicts embedded in them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Methods and labels ──────────────────────────────────────────────────────

/// How a corpus record was found for a draft.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchMethod {
  /// Exact hit on tax identifier + issuing jurisdiction.
  EstablishedIdentifier,
  /// Normalised-name similarity at or above the match threshold.
  FuzzyName,
}

/// Discrete confidence tier derived from a match score.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
  Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchConfidence {
  VeryLow,
  Low,
  Medium,
  High,
  VeryHigh,
}

// ─── Compatibility ───────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergeRisk {
  Low,
  Medium,
  High,
}

/// Verdict on how safely a draft could be merged into a corpus record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCompatibility {
  pub can_merge:           bool,
  pub risk:                MergeRisk,
  pub recommendation:      String,
  /// Heuristic in `0..=100`.
  pub compatibility_score: u8,
  /// Per-factor observations, in evaluation order.
  #[serde(default)]
  pub notes:               Vec<String>,
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// A reviewer's resolution of one match.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
  #[default]
  Pending,
  Merge,
  CreateNew,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeDecision {
  pub decision:   Decision,
  pub decided_by: Option<String>,
  pub decided_at: Option<DateTime<Utc>>,
  pub comment:    Option<String>,
}

impl MergeDecision {
  /// The state every freshly persisted match result starts in.
  pub fn pending() -> Self { Self::default() }
}

// ─── MatchResult ─────────────────────────────────────────────────────────────

/// Namespace for deriving match-result identifiers from the pair they
/// describe.
const MATCH_RESULT_NAMESPACE: Uuid =
  Uuid::from_u128(0x3c1f_5a2e_8d4b_4f6a_9e07_b2d1_c5a8_e3f0);

/// One row per (draft, corpus record) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
  pub match_result_id:  Uuid,
  pub draft_id:         Uuid,
  pub corpus_record_id: Uuid,
  /// The corpus record's name at the time of the check.
  pub corpus_name:      String,
  pub methods:          BTreeSet<MatchMethod>,
  /// Maximum score across contributing methods, in `[0, 1]`.
  pub score:            f64,
  pub confidence:       MatchConfidence,
  pub explanation:      String,
  pub compatibility:    MergeCompatibility,
  pub review_required:  bool,
  /// Zero-based position in the consolidated ordering.
  pub rank:             u32,
  pub decision:         MergeDecision,
}

impl MatchResult {
  /// Stable identifier for the result describing `(draft_id,
  /// corpus_record_id)`. Re-running a check for the same pair reproduces it.
  pub fn id_for(draft_id: Uuid, corpus_record_id: Uuid) -> Uuid {
    let mut name = [0_u8; 32];
    name[..16].copy_from_slice(draft_id.as_bytes());
    name[16..].copy_from_slice(corpus_record_id.as_bytes());
    Uuid::new_v5(&MATCH_RESULT_NAMESPACE, &name)
  }

  pub fn has_method(&self, method: MatchMethod) -> bool {
    self.methods.contains(&method)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn result_id_is_stable_and_pair_specific() {
    let draft = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert_eq!(MatchResult::id_for(draft, a), MatchResult::id_for(draft, a));
    assert_ne!(MatchResult::id_for(draft, a), MatchResult::id_for(draft, b));
    assert_ne!(MatchResult::id_for(draft, a), MatchResult::id_for(a, draft));
  }

  #[test]
  fn decision_parses_from_wire_form() {
    assert_eq!("create_new".parse::<Decision>().unwrap(), Decision::CreateNew);
    assert!("maybe".parse::<Decision>().is_err());
  }

  #[test]
  fn confidence_orders_by_tier() {
    assert!(MatchConfidence::VeryHigh > MatchConfidence::High);
    assert!(MatchConfidence::Low > MatchConfidence::VeryLow);
  }
}
