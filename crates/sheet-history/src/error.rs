//! Error types for the navigation history.
//!
//! [`SheetHistoryError`] wraps the failures of the host shim and of the
//! tools built on it.

use std::io;

use thiserror::Error;

use sheet_history_core::{HistoryTokenError, ValueError};

/// The main error type for sheet history operations.
#[derive(Debug, Error)]
pub enum SheetHistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid token: {0}")]
    Token(#[from] HistoryTokenError),

    #[error("Invalid value: {0}")]
    Value(#[from] ValueError),

    /// An operation name or argument that could not be understood.
    #[error("Invalid operation `{operation}`: {message}")]
    Operation { operation: String, message: String },
}

impl SheetHistoryError {
    /// Create a new `Operation` error.
    pub fn new_operation_error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
