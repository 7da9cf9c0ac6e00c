//! Error types for component operations.

use thiserror::Error;

/// Errors that can occur while constructing or evaluating components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown {category} kind: '{value}'")]
    UnknownKind {
        category: &'static str,
        value: String,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;
