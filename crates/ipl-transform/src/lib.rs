//! Batting transform: validate, filter and derive.
//!
//! [`transform`] is a pure function of its input frame and options, so a
//! retried run over the same staged input produces the same output.

pub mod batting;
pub mod error;
pub mod options;

pub use batting::{TransformOutput, strike_rate, strike_rate_expr, transform};
pub use error::{Result, TransformError};
pub use options::{InvalidRowPolicy, TransformOptions};
