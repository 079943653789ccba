//! Error types for `mergeguard-core`.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parse the text form of one of the domain enums, naming the enum in the
/// error when the value is not recognised.
pub fn parse_variant<T: FromStr>(kind: &'static str, value: &str) -> Result<T> {
  value.parse().map_err(|_| Error::UnknownVariant {
    kind,
    value: value.to_owned(),
  })
}
