//! Tuning for the fuzzy-name corpus scan.

use serde::Deserialize;

/// Controls when and how widely the name scan fans out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
  /// Corpora with at least this many active records are scored on the
  /// worker pool; smaller ones are scored inline.
  pub parallel_threshold: usize,
  /// Upper bound on scan worker threads.
  pub max_workers:        usize,
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      parallel_threshold: 512,
      max_workers:        std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(4),
    }
  }
}
