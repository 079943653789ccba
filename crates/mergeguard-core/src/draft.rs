//! Drafts: business-partner records awaiting review.
//!
//! Drafts are created and edited by upstream intake. The engine only reads
//! them, and moves their workflow status forward when a duplicate review is
//! required.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Whether the draft proposes a new partner or edits an existing one.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
  Create,
  Update,
}

/// The declared commercial role of an entity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityCategory {
  SupplierLike,
  CustomerLike,
  Both,
}

impl EntityCategory {
  /// Equal categories are compatible, and `Both` is compatible with
  /// anything.
  pub fn is_compatible_with(self, other: Self) -> bool {
    self == other || self == Self::Both || other == Self::Both
  }
}

/// Workflow status of a draft.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DraftStatus {
  Draft,
  Submitted,
  PendingDuplicateReview,
  Approved,
  Rejected,
}

/// The role an address plays for the entity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressKind {
  /// The primary/legal address; its jurisdiction drives identifier matching.
  Established,
  Billing,
  Shipping,
  Other,
}

// ─── Sub-records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub kind:         AddressKind,
  pub street:       Option<String>,
  pub locality:     Option<String>,
  /// ISO-style jurisdiction code, e.g. `US` or `DE`.
  pub jurisdiction: String,
}

/// A tax or registration identifier declared on the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxIdentifier {
  pub jurisdiction: String,
  pub value:        String,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
  pub draft_id:        Uuid,
  pub name:            String,
  pub request_kind:    RequestKind,
  pub category:        EntityCategory,
  /// Free-form tag naming the system or business unit the draft came from.
  pub origin:          String,
  pub status:          DraftStatus,
  #[serde(default)]
  pub addresses:       Vec<Address>,
  #[serde(default)]
  pub tax_identifiers: Vec<TaxIdentifier>,
  /// Business-classification tags declared by intake.
  #[serde(default)]
  pub classifications: BTreeSet<String>,
  pub created_at:      DateTime<Utc>,
}

impl Draft {
  /// The first address tagged [`AddressKind::Established`], if any.
  pub fn established_address(&self) -> Option<&Address> {
    self
      .addresses
      .iter()
      .find(|a| a.kind == AddressKind::Established)
  }

  /// Tax identifiers issued by `jurisdiction` (compared case-insensitively).
  pub fn tax_identifiers_in<'a>(
    &'a self,
    jurisdiction: &'a str,
  ) -> impl Iterator<Item = &'a TaxIdentifier> + 'a {
    self
      .tax_identifiers
      .iter()
      .filter(move |t| t.jurisdiction.trim().eq_ignore_ascii_case(jurisdiction.trim()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn both_is_compatible_with_everything() {
    use EntityCategory::*;
    assert!(Both.is_compatible_with(SupplierLike));
    assert!(CustomerLike.is_compatible_with(Both));
    assert!(SupplierLike.is_compatible_with(SupplierLike));
    assert!(!SupplierLike.is_compatible_with(CustomerLike));
  }

  #[test]
  fn status_text_form_is_snake_case() {
    assert_eq!(
      DraftStatus::PendingDuplicateReview.as_ref(),
      "pending_duplicate_review"
    );
    assert_eq!(
      "supplier_like".parse::<EntityCategory>().unwrap(),
      EntityCategory::SupplierLike
    );
  }
}
