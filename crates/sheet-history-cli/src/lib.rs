//! CLI logic for the sheet history tool.
//!
//! The tool parses a URL fragment, applies the requested operations in order
//! and reports the canonical fragment of the resulting token.

pub mod error_adapter;

mod args;
mod config;
mod operation;

pub use args::Args;
pub use operation::Operation;

use log::{debug, info};

use sheet_history::{History, HistoryToken, SheetHistoryError};

/// Run the sheet history CLI application
///
/// Every operation is parsed before any is applied, so a typo never leaves
/// a half-applied result.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SheetHistoryError` for:
/// - Configuration loading errors
/// - Operations that cannot be parsed
/// - Transitions that reject their arguments
pub fn run(args: &Args) -> Result<HistoryToken, SheetHistoryError> {
    info!(
        fragment = args.fragment,
        operations = args.operations.len();
        "Processing fragment"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let operations = args
        .operations
        .iter()
        .map(|text| text.parse::<Operation>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut history = History::new(app_config);
    history.push_fragment(&args.fragment);
    debug!(token = history.current().url_fragment(); "Parsed fragment");

    for operation in &operations {
        let changed = history.apply(|token| operation.apply(token))?;
        debug!(
            operation:?,
            changed,
            token = history.current().url_fragment();
            "Applied operation"
        );
    }

    let token = history.current().clone();
    info!(token = token.url_fragment(); "Fragment processed successfully");

    Ok(token)
}
