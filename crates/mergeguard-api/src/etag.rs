//! ETag computation for a draft's match-result set.
//!
//! The tag is a SHA-256 over the JSON form of the results in rank order, so
//! it changes whenever a re-run or a recorded decision changes what a client
//! would read.

use mergeguard_core::matching::MatchResult;
use sha2::{Digest, Sha256};

pub fn compute_etag(results: &[MatchResult]) -> Result<String, serde_json::Error> {
  let mut hasher = Sha256::new();
  for result in results {
    hasher.update(serde_json::to_vec(result)?);
    hasher.update([b'\n']);
  }
  Ok(format!("\"{}\"", hex::encode(hasher.finalize())))
}
