//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use mergeguard_core::{
  audit::AuditEntry,
  corpus::{CorpusRecord, CorpusStatus},
  draft::Draft,
  matching::{MatchResult, MergeDecision},
  store::{RecordStore, ReviewCommit},
};

use crate::{
  Result,
  encode::{
    AUDIT_COLUMNS, AuditRow, CORPUS_COLUMNS, CorpusRow, DRAFT_COLUMNS,
    DraftRow, MATCH_RESULT_COLUMNS, MatchResultRow, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mergeguard record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_match_results(
    &self,
    where_clause: &'static str,
    key: String,
  ) -> Result<Vec<MatchResult>> {
    let rows: Vec<MatchResultRow> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {MATCH_RESULT_COLUMNS} FROM match_results WHERE {where_clause}
           ORDER BY rank ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], MatchResultRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(MatchResultRow::into_result).collect()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Intake ────────────────────────────────────────────────────────────────

  async fn insert_draft(&self, draft: Draft) -> Result<()> {
    let row = DraftRow::encode(&draft)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO drafts ({DRAFT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (draft_id) DO UPDATE SET
               name            = excluded.name,
               request_kind    = excluded.request_kind,
               category        = excluded.category,
               origin          = excluded.origin,
               status          = excluded.status,
               addresses       = excluded.addresses,
               tax_identifiers = excluded.tax_identifiers,
               classifications = excluded.classifications"
          ),
          rusqlite::params![
            row.draft_id,
            row.name,
            row.request_kind,
            row.category,
            row.origin,
            row.status,
            row.addresses,
            row.tax_identifiers,
            row.classifications,
            row.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_corpus_record(&self, record: CorpusRecord) -> Result<()> {
    let row = CorpusRow::encode(&record)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO corpus_records ({CORPUS_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (record_id) DO UPDATE SET
               name                     = excluded.name,
               status                   = excluded.status,
               category                 = excluded.category,
               established_jurisdiction = excluded.established_jurisdiction,
               established_value        = excluded.established_value,
               origin                   = excluded.origin,
               classifications          = excluded.classifications"
          ),
          rusqlite::params![
            row.record_id,
            row.name,
            row.status,
            row.category,
            row.established_jurisdiction,
            row.established_value,
            row.origin,
            row.classifications,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_draft(&self, id: Uuid) -> Result<Option<Draft>> {
    let id_str = encode_uuid(id);

    let row: Option<DraftRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE draft_id = ?1"),
              rusqlite::params![id_str],
              DraftRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    row.map(DraftRow::into_draft).transpose()
  }

  async fn active_corpus_records(&self) -> Result<Vec<CorpusRecord>> {
    let active = CorpusStatus::Active.as_ref().to_owned();

    let rows: Vec<CorpusRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CORPUS_COLUMNS} FROM corpus_records WHERE status = ?1
           ORDER BY record_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![active], CorpusRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(CorpusRow::into_record).collect()
  }

  async fn find_corpus_by_established_identifier<'a>(
    &'a self,
    jurisdiction: &'a str,
    value: &'a str,
  ) -> Result<Vec<CorpusRecord>> {
    let jurisdiction = jurisdiction.trim().to_owned();
    let value        = value.trim().to_owned();

    let rows: Vec<CorpusRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CORPUS_COLUMNS} FROM corpus_records
           WHERE established_jurisdiction = ?1 COLLATE NOCASE
             AND established_value = ?2
           ORDER BY record_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![jurisdiction, value], CorpusRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(CorpusRow::into_record).collect()
  }

  async fn get_match_result(&self, id: Uuid) -> Result<Option<MatchResult>> {
    let mut found = self
      .query_match_results("match_result_id = ?1", encode_uuid(id))
      .await?;
    Ok(found.pop())
  }

  async fn list_match_results(&self, draft_id: Uuid) -> Result<Vec<MatchResult>> {
    self
      .query_match_results("draft_id = ?1", encode_uuid(draft_id))
      .await
  }

  async fn list_audit_entries(&self, draft_id: Uuid) -> Result<Vec<AuditEntry>> {
    let id_str = encode_uuid(draft_id);

    let rows: Vec<AuditRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {AUDIT_COLUMNS} FROM audit_entries WHERE draft_id = ?1
           ORDER BY recorded_at ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], AuditRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(AuditRow::into_entry).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn commit_review(&self, commit: ReviewCommit) -> Result<()> {
    let draft_id_str = encode_uuid(commit.draft_id);
    let result_count = commit.results.len();
    let rows = commit
      .results
      .iter()
      .map(MatchResultRow::encode)
      .collect::<Result<Vec<_>>>()?;
    let transition = commit.transition.as_ref().map(AuditRow::encode);
    let transitioned = transition.is_some();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "DELETE FROM match_results WHERE draft_id = ?1",
          rusqlite::params![draft_id_str],
        )?;

        {
          let mut insert = tx.prepare(&format!(
            "INSERT INTO match_results ({MATCH_RESULT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
          ))?;
          for row in &rows {
            insert.execute(rusqlite::params![
              row.match_result_id,
              row.draft_id,
              row.corpus_record_id,
              row.corpus_name,
              row.methods,
              row.score,
              row.confidence,
              row.explanation,
              row.compatibility,
              row.review_required,
              row.rank,
              row.decision,
              row.decided_by,
              row.decided_at,
              row.decision_comment,
            ])?;
          }
        }

        if let Some(audit) = transition {
          tx.execute(
            "UPDATE drafts SET status = ?1 WHERE draft_id = ?2",
            rusqlite::params![audit.new_status, draft_id_str],
          )?;
          tx.execute(
            &format!(
              "INSERT INTO audit_entries ({AUDIT_COLUMNS})
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            rusqlite::params![
              audit.audit_id,
              audit.draft_id,
              audit.action,
              audit.prior_status,
              audit.new_status,
              audit.comment,
              audit.system_generated,
              audit.recorded_at,
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(
      draft_id = %commit.draft_id,
      results = result_count,
      transitioned,
      "committed duplicate review",
    );
    Ok(())
  }

  async fn record_decision(
    &self,
    id: Uuid,
    decision: MergeDecision,
  ) -> Result<Option<MatchResult>> {
    let id_str     = encode_uuid(id);
    let decision_s = decision.decision.as_ref().to_owned();
    let decided_at = decision.decided_at.map(encode_dt);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE match_results
           SET decision = ?1, decided_by = ?2, decided_at = ?3, decision_comment = ?4
           WHERE match_result_id = ?5",
          rusqlite::params![
            decision_s,
            decision.decided_by,
            decided_at,
            decision.comment,
            id_str,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_match_result(id).await
  }
}
