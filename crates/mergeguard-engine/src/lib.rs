//! Duplicate detection and merge-compatibility scoring for business-partner
//! drafts.
//!
//! [`DuplicateEngine`] runs a draft through two independent matchers
//! ([`identifier`] and [`fuzzy`]), folds their candidates into one ranked
//! list ([`consolidate`]) scored by [`compatibility`], and lets [`review`]
//! decide whether the draft must wait for a human duplicate review.

pub mod candidate;
pub mod compatibility;
pub mod config;
pub mod consolidate;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod identifier;
pub mod normalize;
pub mod review;
pub mod similarity;

pub use config::ScanConfig;
pub use engine::DuplicateEngine;
pub use error::{Error, Result};
