use thiserror::Error;

/// Violations of the tabular invariants every stage relies on.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("column name is empty at position {index}")]
    EmptyColumnName { index: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
