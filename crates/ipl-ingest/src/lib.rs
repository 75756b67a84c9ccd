//! Data acquisition and staged artifacts for the batting pipeline.
//!
//! - [`extract`]: pull a raw batting frame from a local file or an HTTP
//!   endpoint.
//! - [`artifact`]: write/read the CSV files handed between stages.
//! - [`table`]: the CSV reader both share.

pub mod artifact;
pub mod error;
pub mod extract;
pub mod table;

pub use artifact::{ArtifactInfo, read_artifact, render_artifact, write_artifact};
pub use error::{ArtifactError, ExtractError, TableError};
pub use extract::{Extractor, FileExtractor, HttpExtractor};
pub use table::{read_csv_bytes, read_csv_file};
