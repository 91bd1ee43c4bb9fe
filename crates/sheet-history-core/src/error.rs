//! Error types for history tokens and their value types.
//!
//! Two regimes exist:
//!
//! - [`ValueError`] describes text that failed to parse as a typed value
//!   (a cell reference, an anchor, a name, a JSON payload, ...). The fragment
//!   parser treats these as "stop here" signals and never surfaces them.
//! - [`HistoryTokenError`] is the programmer-error signal returned by token
//!   construction and transition operations when their preconditions are
//!   violated.

use thiserror::Error;

/// A typed value could not be parsed from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("empty {0}")]
    Empty(&'static str),

    #[error("invalid cell reference `{0}`")]
    InvalidCell(String),

    #[error("invalid column reference `{0}`")]
    InvalidColumn(String),

    #[error("invalid row reference `{0}`")]
    InvalidRow(String),

    #[error("invalid label name `{0}`")]
    InvalidLabel(String),

    #[error("invalid anchor `{0}`")]
    InvalidAnchor(String),

    #[error("invalid {kind} `{text}`")]
    Invalid { kind: &'static str, text: String },

    #[error("`{0}` is a reserved keyword")]
    Reserved(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid JSON {kind}: {message}")]
    Json { kind: &'static str, message: String },

    #[error("invalid base64 content: {0}")]
    Base64(String),
}

impl ValueError {
    pub(crate) fn invalid(kind: &'static str, text: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            text: text.into(),
        }
    }
}

/// A precondition of a token constructor or transition was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryTokenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl HistoryTokenError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<ValueError> for HistoryTokenError {
    fn from(error: ValueError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
