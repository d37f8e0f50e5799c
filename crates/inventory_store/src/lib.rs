//! Device and user storage for Gearbook.
//!
//! This crate provides a storage abstraction over device and user records.
//! Records live in a single human-readable JSON document on disk
//! ([`JsonStore`]); an in-memory implementation ([`MemoryStore`]) backs tests
//! and previews.

mod config;
mod document;
mod error;
mod store;

pub use config::*;
pub use document::*;
pub use error::*;
pub use store::*;
