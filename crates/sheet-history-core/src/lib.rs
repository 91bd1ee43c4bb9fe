//! Sheet History Core Types and Definitions
//!
//! This crate provides the navigation state of the spreadsheet client and the
//! value types it is built from. It includes:
//!
//! - **References**: Cells, columns, rows, their ranges and labels ([`reference`] module)
//! - **Selections**: Selections and their anchors ([`selection`] module)
//! - **Names**: Spreadsheet, plugin and form names ([`name`] module)
//! - **Values**: Everything a save token can carry ([`value`] module)
//! - **Tokens**: The [`HistoryToken`] state, its URL fragment and every
//!   transition ([`token`] module)

pub mod color;
pub mod encoding;
pub mod error;
pub mod name;
pub mod offset_count;
pub mod reference;
pub mod selection;
pub mod token;
pub mod value;

pub use error::{HistoryTokenError, ValueError};
pub use offset_count::OffsetAndCount;
pub use selection::{Anchor, AnchoredSelection, Selection, SelectionKind};
pub use token::{
    CellAction, ColumnOrRowAction, FormState, HistoryToken, LabelState, MetadataState,
    PluginState, SpreadsheetContext, SpreadsheetListState, SpreadsheetState, TokenKind,
};
