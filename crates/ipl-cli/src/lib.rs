//! Driver library for the IPL batting ETL.

pub mod config;
pub mod logging;
pub mod notify;
pub mod pipeline;
