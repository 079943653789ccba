//! Transient match candidates produced while scanning.

use mergeguard_core::{corpus::CorpusRecord, matching::MatchMethod};
use uuid::Uuid;

/// One way one corpus record was found for a draft. Several candidates may
/// reference the same record; [`crate::consolidate`] joins them by record id.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
  pub record:      CorpusRecord,
  pub method:      MatchMethod,
  /// Raw score in `[0, 1]`.
  pub score:       f64,
  pub explanation: String,
}

impl MatchCandidate {
  pub fn record_id(&self) -> Uuid { self.record.record_id }
}
