//! Loading drafts and corpus records from a JSON seed file.
//!
//! ```json
//! { "drafts": [ … ], "corpus": [ … ] }
//! ```
//!
//! Both lists are optional. Records are upserted by id, so seeding the same
//! file twice leaves the store unchanged.

use std::path::Path;

use mergeguard_core::{corpus::CorpusRecord, draft::Draft, store::RecordStore};
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
  #[serde(default)]
  pub drafts: Vec<Draft>,
  #[serde(default)]
  pub corpus: Vec<CorpusRecord>,
}

impl SeedFile {
  pub fn parse(bytes: &[u8]) -> Result<Self, Error> { Ok(serde_json::from_slice(bytes)?) }

  pub async fn read(path: &Path) -> Result<Self, Error> {
    let bytes = tokio::fs::read(path).await?;
    Self::parse(&bytes)
  }

  /// Write every record into `store`. Returns `(drafts, corpus records)`.
  pub async fn apply<S: RecordStore>(self, store: &S) -> Result<(usize, usize), Error> {
    let counts = (self.drafts.len(), self.corpus.len());
    for record in self.corpus {
      store
        .insert_corpus_record(record)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
    }
    for draft in self.drafts {
      store
        .insert_draft(draft)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
    }
    Ok(counts)
  }
}

#[cfg(test)]
mod tests {
  use mergeguard_core::draft::{DraftStatus, RequestKind};
  use mergeguard_store_sqlite::SqliteStore;

  use super::*;

  const SEED: &str = r#"{
    "drafts": [{
      "draft_id": "6f1c2a8e-0d5b-4c3e-9a7f-1b2c3d4e5f60",
      "name": "ACME Corporation Ltd",
      "request_kind": "create",
      "category": "supplier_like",
      "origin": "us-procurement",
      "status": "submitted",
      "addresses": [{
        "kind": "established",
        "street": null,
        "locality": null,
        "jurisdiction": "US"
      }],
      "tax_identifiers": [{ "jurisdiction": "US", "value": "US987654321" }],
      "classifications": ["raw-materials"],
      "created_at": "2026-01-05T09:30:00Z"
    }],
    "corpus": [{
      "record_id": "0a9b8c7d-6e5f-4a3b-8c2d-1e0f9a8b7c6d",
      "name": "ACME Corporation",
      "status": "active",
      "category": "supplier_like",
      "established_identifier": { "jurisdiction": "US", "value": "US987654321" },
      "origin": "us-procurement",
      "classifications": ["raw-materials"]
    }]
  }"#;

  #[test]
  fn empty_object_is_an_empty_seed() {
    let seed = SeedFile::parse(b"{}").unwrap();
    assert!(seed.drafts.is_empty() && seed.corpus.is_empty());
  }

  #[test]
  fn malformed_json_is_rejected() {
    assert!(matches!(SeedFile::parse(b"{\"drafts\": 3}"), Err(Error::SeedParse(_))));
  }

  #[tokio::test]
  async fn seeding_twice_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let seed = SeedFile::parse(SEED.as_bytes()).unwrap();
    let draft_id = seed.drafts[0].draft_id;

    assert_eq!(seed.apply(&store).await.unwrap(), (1, 1));
    SeedFile::parse(SEED.as_bytes())
      .unwrap()
      .apply(&store)
      .await
      .unwrap();

    let draft = store.get_draft(draft_id).await.unwrap().unwrap();
    assert_eq!(draft.request_kind, RequestKind::Create);
    assert_eq!(draft.status, DraftStatus::Submitted);
    assert_eq!(store.active_corpus_records().await.unwrap().len(), 1);
  }
}
