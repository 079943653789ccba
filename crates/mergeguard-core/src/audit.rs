//! Audit trail entries.
//!
//! Entries are append-only. The engine writes one only as a side effect of a
//! status transition it performs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::draft::DraftStatus;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
  DuplicateReviewRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
  pub audit_id:         Uuid,
  pub draft_id:         Uuid,
  pub action:           AuditAction,
  pub prior_status:     DraftStatus,
  pub new_status:       DraftStatus,
  pub comment:          String,
  /// `true` when the engine, not a person, caused the transition.
  pub system_generated: bool,
  pub recorded_at:      DateTime<Utc>,
}
