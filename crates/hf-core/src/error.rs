//! Numeric argument errors shared by the component constructors.

use thiserror::Error;

pub type HfResult<T> = Result<T, HfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HfError {
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Finite but outside the accepted range.
    #[error("{what} out of range")]
    InvalidArg { what: &'static str },
}
