//! Canonical form of free-text entity names.

/// Legal-form tokens dropped from names. Matched only as whole tokens, so
/// `co` is removed from "acme co" but not from "costco".
const LEGAL_SUFFIXES: &[&str] = &[
  "ltd",
  "limited",
  "inc",
  "incorporated",
  "corp",
  "corporation",
  "co",
  "company",
  "gmbh",
  "ag",
  "llc",
  "plc",
  "and",
];

/// Normalise an entity name for comparison.
///
/// Lower-cases, drops every character that is not a letter, digit or
/// whitespace, drops legal-form tokens, and collapses runs of whitespace to a
/// single space. Idempotent; empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
  let cleaned: String = raw
    .trim()
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect();

  cleaned
    .split_whitespace()
    .filter(|token| !LEGAL_SUFFIXES.contains(token))
    .collect::<Vec<_>>()
    .join(" ")
}
