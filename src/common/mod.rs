//! Types and utilities shared across the crate.

pub mod error;
pub mod unit;
pub mod xml;

pub use error::{Error, Result};
