//! Load a staged artifact into a SQLite table.
//!
//! One run is one transaction: the table is created if needed, checked for
//! drift, optionally cleared, and filled. Readers see either the previous
//! contents or the whole new batch.

pub mod error;
pub mod loader;
mod sql;

pub use error::{LoadError, Result};
pub use loader::{LoadMode, LoadSummary, Loader};
