//! Sheet History Parser
//!
//! Reads URL fragments back into [`HistoryToken`]s. Every token renders a
//! canonical fragment through [`HistoryToken::url_fragment`], and parsing that
//! fragment yields an equal token.
//!
//! # Example
//!
//! ```
//! let token = sheet_history_parser::parse("/123/Sales/cell/A1/formula/save/=12%2B3");
//! assert_eq!(token.url_fragment(), "/123/Sales/cell/A1/formula/save/=12%2B3");
//!
//! // Damaged fragments degrade to the last state that could be read.
//! let token = sheet_history_parser::parse("/123/Sales/cell/A1/sort/save/!invalid");
//! assert_eq!(token.url_fragment(), "/123/Sales/cell/A1");
//! ```

mod parser;

#[cfg(test)]
mod parser_tests;

use sheet_history_core::HistoryToken;

/// Parses a URL fragment, with or without its leading `#`.
///
/// Never fails. A segment that cannot be read is dropped together with
/// everything after it, and a fragment naming no known state becomes
/// [`sheet_history_core::TokenKind::Unknown`].
pub fn parse(fragment: &str) -> HistoryToken {
    parser::parse_fragment(fragment)
}
