//! Tabular data model for the IPL batting pipeline.
//!
//! Every stage exchanges a polars [`DataFrame`](polars::prelude::DataFrame).
//! This crate names the batting columns and reads column types back out of
//! a frame's schema in the coarse form the loader and the CLI need.

pub mod batting;
pub mod error;
pub mod frame;

pub use error::{ModelError, Result};
pub use frame::{ColumnProfile, ColumnType, cell_text, profile, validate_headers};
