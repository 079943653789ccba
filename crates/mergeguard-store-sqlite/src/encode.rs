//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Enums use their snake_case text form.
//! Nested structures (addresses, tax identifiers, method sets,
//! compatibility verdicts) are compact JSON. UUIDs are hyphenated lowercase
//! strings.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use mergeguard_core::{
  audit::AuditEntry,
  corpus::{CorpusRecord, EstablishedIdentifier},
  draft::Draft,
  matching::{MatchMethod, MatchResult, MergeDecision},
  parse_variant,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

fn check_score(score: f64) -> Result<f64> {
  if (0.0..=1.0).contains(&score) {
    Ok(score)
  } else {
    Err(Error::ScoreOutOfRange(score))
  }
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

/// Column values for one `drafts` row, ready to bind.
pub struct DraftRow {
  pub draft_id:        String,
  pub name:            String,
  pub request_kind:    String,
  pub category:        String,
  pub origin:          String,
  pub status:          String,
  pub addresses:       String,
  pub tax_identifiers: String,
  pub classifications: String,
  pub created_at:      String,
}

impl DraftRow {
  pub fn encode(draft: &Draft) -> Result<Self> {
    Ok(Self {
      draft_id:        encode_uuid(draft.draft_id),
      name:            draft.name.clone(),
      request_kind:    draft.request_kind.as_ref().to_owned(),
      category:        draft.category.as_ref().to_owned(),
      origin:          draft.origin.clone(),
      status:          draft.status.as_ref().to_owned(),
      addresses:       encode_json(&draft.addresses)?,
      tax_identifiers: encode_json(&draft.tax_identifiers)?,
      classifications: encode_json(&draft.classifications)?,
      created_at:      encode_dt(draft.created_at),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      draft_id:        row.get(0)?,
      name:            row.get(1)?,
      request_kind:    row.get(2)?,
      category:        row.get(3)?,
      origin:          row.get(4)?,
      status:          row.get(5)?,
      addresses:       row.get(6)?,
      tax_identifiers: row.get(7)?,
      classifications: row.get(8)?,
      created_at:      row.get(9)?,
    })
  }

  pub fn into_draft(self) -> Result<Draft> {
    Ok(Draft {
      draft_id:        decode_uuid(&self.draft_id)?,
      name:            self.name,
      request_kind:    parse_variant("request kind", &self.request_kind)?,
      category:        parse_variant("entity category", &self.category)?,
      origin:          self.origin,
      status:          parse_variant("draft status", &self.status)?,
      addresses:       decode_json(&self.addresses)?,
      tax_identifiers: decode_json(&self.tax_identifiers)?,
      classifications: decode_json(&self.classifications)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const DRAFT_COLUMNS: &str = "draft_id, name, request_kind, category, origin, status,
   addresses, tax_identifiers, classifications, created_at";

// ─── Corpus records ──────────────────────────────────────────────────────────

pub struct CorpusRow {
  pub record_id:                String,
  pub name:                     String,
  pub status:                   String,
  pub category:                 String,
  pub established_jurisdiction: Option<String>,
  pub established_value:        Option<String>,
  pub origin:                   String,
  pub classifications:          String,
}

impl CorpusRow {
  pub fn encode(record: &CorpusRecord) -> Result<Self> {
    let (jurisdiction, value) = match &record.established_identifier {
      Some(id) => (Some(id.jurisdiction.clone()), Some(id.value.clone())),
      None => (None, None),
    };
    Ok(Self {
      record_id:                encode_uuid(record.record_id),
      name:                     record.name.clone(),
      status:                   record.status.as_ref().to_owned(),
      category:                 record.category.as_ref().to_owned(),
      established_jurisdiction: jurisdiction,
      established_value:        value,
      origin:                   record.origin.clone(),
      classifications:          encode_json(&record.classifications)?,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:                row.get(0)?,
      name:                     row.get(1)?,
      status:                   row.get(2)?,
      category:                 row.get(3)?,
      established_jurisdiction: row.get(4)?,
      established_value:        row.get(5)?,
      origin:                   row.get(6)?,
      classifications:          row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<CorpusRecord> {
    let established_identifier =
      match (self.established_jurisdiction, self.established_value) {
        (Some(jurisdiction), Some(value)) => {
          Some(EstablishedIdentifier { jurisdiction, value })
        }
        _ => None,
      };
    Ok(CorpusRecord {
      record_id: decode_uuid(&self.record_id)?,
      name: self.name,
      status: parse_variant("corpus status", &self.status)?,
      category: parse_variant("entity category", &self.category)?,
      established_identifier,
      origin: self.origin,
      classifications: decode_json(&self.classifications)?,
    })
  }
}

pub const CORPUS_COLUMNS: &str = "record_id, name, status, category,
   established_jurisdiction, established_value, origin, classifications";

// ─── Match results ───────────────────────────────────────────────────────────

pub struct MatchResultRow {
  pub match_result_id:  String,
  pub draft_id:         String,
  pub corpus_record_id: String,
  pub corpus_name:      String,
  pub methods:          String,
  pub score:            f64,
  pub confidence:       String,
  pub explanation:      String,
  pub compatibility:    String,
  pub review_required:  bool,
  pub rank:             u32,
  pub decision:         String,
  pub decided_by:       Option<String>,
  pub decided_at:       Option<String>,
  pub decision_comment: Option<String>,
}

impl MatchResultRow {
  pub fn encode(result: &MatchResult) -> Result<Self> {
    Ok(Self {
      match_result_id:  encode_uuid(result.match_result_id),
      draft_id:         encode_uuid(result.draft_id),
      corpus_record_id: encode_uuid(result.corpus_record_id),
      corpus_name:      result.corpus_name.clone(),
      methods:          encode_json(&result.methods)?,
      score:            check_score(result.score)?,
      confidence:       result.confidence.as_ref().to_owned(),
      explanation:      result.explanation.clone(),
      compatibility:    encode_json(&result.compatibility)?,
      review_required:  result.review_required,
      rank:             result.rank,
      decision:         result.decision.decision.as_ref().to_owned(),
      decided_by:       result.decision.decided_by.clone(),
      decided_at:       result.decision.decided_at.map(encode_dt),
      decision_comment: result.decision.comment.clone(),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      match_result_id:  row.get(0)?,
      draft_id:         row.get(1)?,
      corpus_record_id: row.get(2)?,
      corpus_name:      row.get(3)?,
      methods:          row.get(4)?,
      score:            row.get(5)?,
      confidence:       row.get(6)?,
      explanation:      row.get(7)?,
      compatibility:    row.get(8)?,
      review_required:  row.get(9)?,
      rank:             row.get(10)?,
      decision:         row.get(11)?,
      decided_by:       row.get(12)?,
      decided_at:       row.get(13)?,
      decision_comment: row.get(14)?,
    })
  }

  pub fn into_result(self) -> Result<MatchResult> {
    let methods: BTreeSet<MatchMethod> = decode_json(&self.methods)?;

    Ok(MatchResult {
      match_result_id:  decode_uuid(&self.match_result_id)?,
      draft_id:         decode_uuid(&self.draft_id)?,
      corpus_record_id: decode_uuid(&self.corpus_record_id)?,
      corpus_name:      self.corpus_name,
      methods,
      score:            check_score(self.score)?,
      confidence:       parse_variant("match confidence", &self.confidence)?,
      explanation:      self.explanation,
      compatibility:    decode_json(&self.compatibility)?,
      review_required:  self.review_required,
      rank:             self.rank,
      decision:         MergeDecision {
        decision:   parse_variant("decision", &self.decision)?,
        decided_by: self.decided_by,
        decided_at: self.decided_at.as_deref().map(decode_dt).transpose()?,
        comment:    self.decision_comment,
      },
    })
  }
}

pub const MATCH_RESULT_COLUMNS: &str = "match_result_id, draft_id, corpus_record_id,
   corpus_name, methods, score, confidence, explanation, compatibility,
   review_required, rank, decision, decided_by, decided_at, decision_comment";

// ─── Audit entries ───────────────────────────────────────────────────────────

pub struct AuditRow {
  pub audit_id:         String,
  pub draft_id:         String,
  pub action:           String,
  pub prior_status:     String,
  pub new_status:       String,
  pub comment:          String,
  pub system_generated: bool,
  pub recorded_at:      String,
}

impl AuditRow {
  pub fn encode(entry: &AuditEntry) -> Self {
    Self {
      audit_id:         encode_uuid(entry.audit_id),
      draft_id:         encode_uuid(entry.draft_id),
      action:           entry.action.as_ref().to_owned(),
      prior_status:     entry.prior_status.as_ref().to_owned(),
      new_status:       entry.new_status.as_ref().to_owned(),
      comment:          entry.comment.clone(),
      system_generated: entry.system_generated,
      recorded_at:      encode_dt(entry.recorded_at),
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      audit_id:         row.get(0)?,
      draft_id:         row.get(1)?,
      action:           row.get(2)?,
      prior_status:     row.get(3)?,
      new_status:       row.get(4)?,
      comment:          row.get(5)?,
      system_generated: row.get(6)?,
      recorded_at:      row.get(7)?,
    })
  }

  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      audit_id:         decode_uuid(&self.audit_id)?,
      draft_id:         decode_uuid(&self.draft_id)?,
      action:           parse_variant("audit action", &self.action)?,
      prior_status:     parse_variant("draft status", &self.prior_status)?,
      new_status:       parse_variant("draft status", &self.new_status)?,
      comment:          self.comment,
      system_generated: self.system_generated,
      recorded_at:      decode_dt(&self.recorded_at)?,
    })
  }
}

pub const AUDIT_COLUMNS: &str = "audit_id, draft_id, action, prior_status, new_status,
   comment, system_generated, recorded_at";
