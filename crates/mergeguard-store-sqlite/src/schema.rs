//! SQL schema for the mergeguard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS drafts (
    draft_id         TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    request_kind     TEXT NOT NULL,   -- 'create' | 'update'
    category         TEXT NOT NULL,   -- 'supplier_like' | 'customer_like' | 'both'
    origin           TEXT NOT NULL,
    status           TEXT NOT NULL,
    addresses        TEXT NOT NULL DEFAULT '[]',
    tax_identifiers  TEXT NOT NULL DEFAULT '[]',
    classifications  TEXT NOT NULL DEFAULT '[]',
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS corpus_records (
    record_id                 TEXT PRIMARY KEY,
    name                      TEXT NOT NULL,
    status                    TEXT NOT NULL,   -- 'active' | 'blocked' | ...
    category                  TEXT NOT NULL,
    established_jurisdiction  TEXT,
    established_value         TEXT,
    origin                    TEXT NOT NULL,
    classifications           TEXT NOT NULL DEFAULT '[]'
);

-- Replaced wholesale by each duplicate check; never appended to.
CREATE TABLE IF NOT EXISTS match_results (
    match_result_id   TEXT PRIMARY KEY,
    draft_id          TEXT NOT NULL REFERENCES drafts(draft_id),
    corpus_record_id  TEXT NOT NULL REFERENCES corpus_records(record_id),
    corpus_name       TEXT NOT NULL,
    methods           TEXT NOT NULL,   -- JSON array of method tags
    score             REAL NOT NULL,
    confidence        TEXT NOT NULL,
    explanation       TEXT NOT NULL,
    compatibility     TEXT NOT NULL,   -- JSON-encoded MergeCompatibility
    review_required   INTEGER NOT NULL,
    rank              INTEGER NOT NULL,
    decision          TEXT NOT NULL DEFAULT 'pending',
    decided_by        TEXT,
    decided_at        TEXT,
    decision_comment  TEXT,
    UNIQUE (draft_id, corpus_record_id),
    CHECK  (score >= 0.0 AND score <= 1.0)
);

-- Append-only.
CREATE TABLE IF NOT EXISTS audit_entries (
    audit_id          TEXT PRIMARY KEY,
    draft_id          TEXT NOT NULL REFERENCES drafts(draft_id),
    action            TEXT NOT NULL,
    prior_status      TEXT NOT NULL,
    new_status        TEXT NOT NULL,
    comment           TEXT NOT NULL,
    system_generated  INTEGER NOT NULL,
    recorded_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS corpus_status_idx      ON corpus_records(status);
CREATE INDEX IF NOT EXISTS corpus_established_idx
    ON corpus_records(established_jurisdiction, established_value);
CREATE INDEX IF NOT EXISTS match_results_draft_idx ON match_results(draft_id, rank);
CREATE INDEX IF NOT EXISTS audit_draft_idx        ON audit_entries(draft_id, recorded_at);

PRAGMA user_version = 1;
";
