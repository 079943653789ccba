//! Similarity between two normalised names.

/// Minimum similarity for a fuzzy-name match. A contract constant: it is not
/// configurable per call.
pub const MATCH_THRESHOLD: f64 = 0.95;

/// Normalised Levenshtein similarity in `[0, 1]`.
///
/// `1.0` exactly when the inputs are identical; each additional edit lowers
/// the score. Symmetric and deterministic.
pub fn similarity(a: &str, b: &str) -> f64 {
  strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_scores_one() {
    for s in ["acme", "northwind trading partners", "müller söhne"] {
      assert_eq!(similarity(s, s), 1.0);
    }
  }

  #[test]
  fn symmetric() {
    let (a, b) = ("northwind trading partners", "northwind trading partner");
    assert_eq!(similarity(a, b), similarity(b, a));
  }

  #[test]
  fn degrades_with_more_edits() {
    let base = "northwind trading partners";
    let one = similarity(base, "northwind trading partner");
    let two = similarity(base, "northwind trading partn");
    assert!(one < 1.0);
    assert!(two < one);
  }

  #[test]
  fn single_edit_on_long_name_clears_threshold() {
    // 1 edit over 26 characters.
    let score = similarity("northwind trading partners", "northwind trading partner");
    assert!((score - (1.0 - 1.0 / 26.0)).abs() < 1e-12);
    assert!(score >= MATCH_THRESHOLD);
  }

  #[test]
  fn single_edit_on_short_name_does_not() {
    assert!(similarity("acme widgets", "acme widget") < MATCH_THRESHOLD);
  }
}
