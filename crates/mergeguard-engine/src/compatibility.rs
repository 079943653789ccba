//! Merge-compatibility scoring between a draft and one corpus record.
//!
//! The score is additive, built from four factors, with two hard stops:
//!
//! | Factor | Points |
//! |--------|--------|
//! | corpus record is `Active` | 25 (otherwise stop at 0) |
//! | entity categories compatible | 25 (otherwise stop) |
//! | same origin / different origin | 30 / 10 |
//! | identical / differing classifications | 20 / 5 |

use mergeguard_core::{
  corpus::CorpusRecord,
  draft::Draft,
  matching::{MergeCompatibility, MergeRisk},
};

/// Minimum score at which a merge is allowed at all.
pub const MERGE_FLOOR: u8 = 50;

/// Analyse how safely `draft` could be merged into `record`.
pub fn analyze(draft: &Draft, record: &CorpusRecord) -> MergeCompatibility {
  if !record.status.is_active() {
    return MergeCompatibility {
      can_merge:           false,
      risk:                MergeRisk::High,
      recommendation:      format!("cannot merge: existing record is {}", record.status),
      compatibility_score: 0,
      notes:               vec![format!("existing record is {}", record.status)],
    };
  }

  let mut score: u8 = 25;
  let mut notes = Vec::new();

  if !draft.category.is_compatible_with(record.category) {
    notes.push(format!(
      "draft is {} but existing record is {}",
      draft.category, record.category
    ));
    return MergeCompatibility {
      can_merge:           false,
      risk:                MergeRisk::High,
      recommendation:      "incompatible entity categories".to_owned(),
      compatibility_score: score,
      notes,
    };
  }
  score += 25;

  if draft.origin == record.origin {
    score += 30;
    notes.push("strong candidate: same origin".to_owned());
  } else {
    score += 10;
    notes.push(format!(
      "different origin ({} vs {})",
      draft.origin, record.origin
    ));
  }

  if draft.classifications == record.classifications {
    score += 20;
    notes.push("identical business classifications".to_owned());
  } else {
    score += 5;
    notes.push("business classifications differ".to_owned());
  }

  let (risk, recommendation) = band(score);
  MergeCompatibility {
    can_merge: score >= MERGE_FLOOR,
    risk,
    recommendation: recommendation.to_owned(),
    compatibility_score: score,
    notes,
  }
}

fn band(score: u8) -> (MergeRisk, &'static str) {
  match score {
    80.. => (MergeRisk::Low, "excellent candidate"),
    60..80 => (MergeRisk::Low, "good candidate"),
    MERGE_FLOOR..60 => (MergeRisk::Medium, "merge possible, review required"),
    _ => (MergeRisk::High, "not recommended"),
  }
}
