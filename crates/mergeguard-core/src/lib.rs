//! Core types and trait definitions for the mergeguard duplicate-review
//! engine.
//!
//! This crate is deliberately free of HTTP, database and runtime
//! dependencies. The engine, the storage backends and the API all depend on
//! it.

// Backends implement `RecordStore` with native `async fn`.
#![allow(async_fn_in_trait)]

pub mod audit;
pub mod corpus;
pub mod draft;
pub mod error;
pub mod matching;
pub mod store;

pub use error::{Error, Result, parse_variant};
