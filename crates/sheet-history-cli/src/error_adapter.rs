//! Error adapter for converting SheetHistoryError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Operation errors
//! carry the operation text as source code so the report can point at it.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use sheet_history::{HistoryTokenError, SheetHistoryError};

/// Adapter rendering a [`SheetHistoryError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a SheetHistoryError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SheetHistoryError::Io(_) => "sheet_history::io",
            SheetHistoryError::Config(_) => "sheet_history::config",
            SheetHistoryError::Token(HistoryTokenError::InvalidArgument(_)) => {
                "sheet_history::invalid_argument"
            }
            SheetHistoryError::Token(HistoryTokenError::InvalidState(_)) => {
                "sheet_history::invalid_state"
            }
            SheetHistoryError::Value(_) => "sheet_history::value",
            SheetHistoryError::Operation { .. } => "sheet_history::operation",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            SheetHistoryError::Operation { .. } => {
                "operations are written `name` or `name=argument`, e.g. `select=cell:B2`"
            }
            SheetHistoryError::Token(HistoryTokenError::InvalidState(_)) => {
                "only selections starting at column A or row 1 can be frozen"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            SheetHistoryError::Operation { operation, .. } => {
                Some(operation as &dyn miette::SourceCode)
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match &self.0 {
            SheetHistoryError::Operation { operation, message } => {
                let span = SourceSpan::new(0.into(), operation.len());
                Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
                    Some(message.clone()),
                    span,
                ))))
            }
            _ => None,
        }
    }
}

/// Wrap a [`SheetHistoryError`] for rendering by miette.
pub fn to_reportable(err: &SheetHistoryError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_points_at_operation() {
        let err = SheetHistoryError::new_operation_error("jump", "unknown operation");
        let adapter = to_reportable(&err);

        assert_eq!(
            adapter.code().map(|code| code.to_string()),
            Some("sheet_history::operation".to_string())
        );
        assert!(adapter.source_code().is_some());

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label(), Some("unknown operation"));
        assert!(labels[0].primary());
        assert_eq!(labels[0].len(), 4);
    }

    #[test]
    fn test_token_error() {
        let err = SheetHistoryError::Token(HistoryTokenError::InvalidState("B:C".to_string()));
        let adapter = to_reportable(&err);

        assert_eq!(adapter.to_string(), "Invalid token: Invalid state: B:C");
        assert!(adapter.help().is_some());
        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = SheetHistoryError::Config("bad".to_string());
        let adapter = to_reportable(&err);

        assert_eq!(
            adapter.code().map(|code| code.to_string()),
            Some("sheet_history::config".to_string())
        );
        assert!(adapter.help().is_none());
    }
}
