//! Exact matching on the draft's established tax identifier.

use std::collections::BTreeSet;

use mergeguard_core::{
  draft::{Draft, RequestKind},
  matching::MatchMethod,
  store::RecordStore,
};

use crate::candidate::MatchCandidate;

/// Look up corpus records sharing an identifier with the draft.
///
/// Only `Create` drafts are matched. The jurisdiction comes from the draft's
/// established address; only tax identifiers issued by that jurisdiction are
/// looked up. Hits of any corpus status become candidates with score `1.0`.
/// A draft without an established address simply yields nothing.
pub async fn find_candidates<S>(
  store: &S,
  draft: &Draft,
) -> Result<Vec<MatchCandidate>, S::Error>
where
  S: RecordStore,
{
  if draft.request_kind != RequestKind::Create {
    tracing::debug!(draft_id = %draft.draft_id, "update draft; identifier matching skipped");
    return Ok(Vec::new());
  }

  let Some(address) = draft.established_address() else {
    tracing::debug!(draft_id = %draft.draft_id, "no established address");
    return Ok(Vec::new());
  };

  let jurisdiction = address.jurisdiction.trim();
  if jurisdiction.is_empty() {
    return Ok(Vec::new());
  }

  let values: BTreeSet<&str> = draft
    .tax_identifiers_in(jurisdiction)
    .map(|t| t.value.trim())
    .filter(|v| !v.is_empty())
    .collect();

  let mut candidates = Vec::new();
  for value in values {
    let hits = store
      .find_corpus_by_established_identifier(jurisdiction, value)
      .await?;
    for record in hits {
      candidates.push(MatchCandidate {
        explanation: format!(
          "established identifier {value} ({jurisdiction}) matches {:?}",
          record.name
        ),
        record,
        method: MatchMethod::EstablishedIdentifier,
        score: 1.0,
      });
    }
  }

  tracing::debug!(
    draft_id = %draft.draft_id,
    jurisdiction,
    found = candidates.len(),
    "identifier matching finished",
  );
  Ok(candidates)
}
