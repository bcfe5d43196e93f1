//! # ns-core
//!
//! Shared error type and policy enums for the NextStat combine crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::NegativeBinPolicy;
