//! Sheet History - URL-fragment navigation state for a spreadsheet client.
//!
//! Every screen, dialog and selection of the client is a [`HistoryToken`].
//! Tokens render a canonical URL fragment, are read back from fragments by
//! [`parse`], and change through pure transition methods. A [`History`]
//! holds the current token on behalf of the host and tells watchers when it
//! changes.
//!
//! # Examples
//!
//! ```
//! use sheet_history::{Anchor, AnchoredSelection, Selection};
//!
//! let token = sheet_history::parse("/123/Sales/cell/B2:C3/top-left/clear");
//! assert_eq!(token.clear_action().url_fragment(), "/123/Sales/cell/B2:C3/top-left");
//!
//! let selection = AnchoredSelection::new(Selection::parse_cell("D4").unwrap(), Anchor::None)
//!     .unwrap();
//! let moved = token.set_selection(Some(selection));
//! assert_eq!(moved.url_fragment(), "/123/Sales/cell/D4");
//! ```

pub mod config;

mod error;
mod history;

pub use sheet_history_core::{
    CellAction, ColumnOrRowAction, FormState, HistoryToken, HistoryTokenError, LabelState,
    MetadataState, OffsetAndCount, PluginState, SpreadsheetContext, SpreadsheetListState,
    SpreadsheetState, TokenKind, ValueError,
};
pub use sheet_history_core::{
    Anchor, AnchoredSelection, Selection, SelectionKind, color, name, reference, value,
};

pub use error::SheetHistoryError;
pub use history::{History, WatcherId};

/// Parses a URL fragment into a token. Never fails.
///
/// See [`sheet_history_parser::parse`].
pub fn parse(fragment: &str) -> HistoryToken {
    sheet_history_parser::parse(fragment)
}
