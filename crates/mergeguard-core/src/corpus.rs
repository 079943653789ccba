//! Corpus records: entities already accepted into the system, against which
//! new drafts are checked.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::draft::EntityCategory;

/// Lifecycle status of an accepted entity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CorpusStatus {
  Active,
  Blocked,
  Inactive,
  Archived,
}

impl CorpusStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

/// A record's canonical tax/registration identifier and the jurisdiction
/// that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishedIdentifier {
  pub jurisdiction: String,
  pub value:        String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
  pub record_id:              Uuid,
  pub name:                   String,
  pub status:                 CorpusStatus,
  pub category:               EntityCategory,
  pub established_identifier: Option<EstablishedIdentifier>,
  pub origin:                 String,
  /// Business-classification tags. Ordered so that equality and
  /// serialisation are independent of insertion order.
  #[serde(default)]
  pub classifications:        BTreeSet<String>,
}
