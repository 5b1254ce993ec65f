//! Unified error types for deckscribe.
//!
//! Each layer has its own error enum (`OpcError` for the package container,
//! `OoxmlError` for the deck); this module folds them into one crate-level
//! type so the CLI can decide which failures are fatal.

pub mod conversions;
pub mod types;

pub use types::{Error, Result};
