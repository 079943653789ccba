//! Whether a consolidated result list sends the draft to duplicate review.

use chrono::{DateTime, Utc};
use mergeguard_core::{
  audit::{AuditAction, AuditEntry},
  draft::{Draft, DraftStatus},
  matching::{MatchMethod, MatchResult},
};
use uuid::Uuid;

/// A result list whose best score reaches this holds the draft for review.
pub const REVIEW_SCORE_THRESHOLD: f64 = 0.90;

/// Results scoring strictly above this are flagged for a reviewer.
pub const REVIEW_REQUIRED_ABOVE: f64 = 0.8;

pub fn review_required(score: f64) -> bool { score > REVIEW_REQUIRED_ABOVE }

/// `true` when the list is non-empty and either its best score reaches
/// [`REVIEW_SCORE_THRESHOLD`] or any entry was found by identifier.
pub fn triggers_review(results: &[MatchResult]) -> bool {
  let best = results.iter().map(|r| r.score).fold(f64::NEG_INFINITY, f64::max);
  !results.is_empty()
    && (best >= REVIEW_SCORE_THRESHOLD
      || results
        .iter()
        .any(|r| r.has_method(MatchMethod::EstablishedIdentifier)))
}

/// The audit entry for moving `draft` to
/// [`DraftStatus::PendingDuplicateReview`], or `None` when the draft stays
/// where it is.
///
/// Only a `Submitted` draft can move; a draft already under review is left
/// alone so that repeated checks do not grow the audit trail.
pub fn plan_transition(
  draft: &Draft,
  results: &[MatchResult],
  now: DateTime<Utc>,
) -> Option<AuditEntry> {
  if !triggers_review(results) {
    return None;
  }
  if draft.status != DraftStatus::Submitted {
    tracing::debug!(
      draft_id = %draft.draft_id,
      status = %draft.status,
      "review condition met but draft is not submitted; status unchanged",
    );
    return None;
  }

  Some(AuditEntry {
    audit_id:         Uuid::new_v4(),
    draft_id:         draft.draft_id,
    action:           AuditAction::DuplicateReviewRequested,
    prior_status:     draft.status,
    new_status:       DraftStatus::PendingDuplicateReview,
    comment:          format!("{} potential duplicate(s) found", results.len()),
    system_generated: true,
    recorded_at:      now,
  })
}
