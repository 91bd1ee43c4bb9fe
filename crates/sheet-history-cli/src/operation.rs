//! Operations accepted by `--op`.
//!
//! Each operation is written `name` or `name=argument` and maps onto one
//! transition of [`HistoryToken`].

use std::str::FromStr;

use sheet_history::{
    Anchor, AnchoredSelection, HistoryToken, HistoryTokenError, OffsetAndCount, Selection,
    SheetHistoryError, ValueError, value::MetadataProperty,
};

/// A single transition requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ClearAction,
    Close,
    Delete,
    Clear,
    Freeze,
    Unfreeze,
    /// `menu` or `menu=<selection>`
    Menu(Option<AnchoredSelection>),
    Toolbar,
    Reload,
    Rename,
    CreateLabel,
    /// `select=<cell|column|row>:<selection>[/<anchor>]`
    Select(AnchoredSelection),
    /// `save=<text>`, an empty text clears the value
    Save(String),
    Offset(u32),
    Count(u32),
    Metadata(MetadataProperty),
    Labels,
}

impl Operation {
    /// Applies the operation to `token`.
    ///
    /// # Errors
    ///
    /// Returns the [`HistoryTokenError`] of the underlying transition.
    pub fn apply(&self, token: &HistoryToken) -> Result<HistoryToken, HistoryTokenError> {
        Ok(match self {
            Self::ClearAction => token.clear_action(),
            Self::Close => token.close(),
            Self::Delete => token.delete(),
            Self::Clear => token.clear(),
            Self::Freeze => token.freeze()?,
            Self::Unfreeze => token.unfreeze()?,
            Self::Menu(selection) => token.menu(selection.clone()),
            Self::Toolbar => token.toolbar(),
            Self::Reload => token.reload(),
            Self::Rename => token.rename(),
            Self::CreateLabel => token.create_label(),
            Self::Select(selection) => token.set_selection(Some(selection.clone())),
            Self::Save(text) => token.set_save_string_value(text)?,
            Self::Offset(offset) => token.set_offset(Some(*offset)),
            Self::Count(count) => token.set_count(Some(*count)),
            Self::Metadata(property) => token.set_metadata_property_name(*property),
            Self::Labels => token.set_labels(OffsetAndCount::EMPTY),
        })
    }
}

/// Parses `<selection>[/<anchor>]` with `parse`.
fn anchored(
    text: &str,
    parse: fn(&str) -> Result<Selection, ValueError>,
) -> Result<AnchoredSelection, HistoryTokenError> {
    let (selection, anchor) = match text.split_once('/') {
        Some((selection, anchor)) => (selection, anchor.parse::<Anchor>()?),
        None => (text, Anchor::None),
    };
    AnchoredSelection::new(parse(selection)?, anchor)
}

fn select(argument: &str) -> Result<AnchoredSelection, String> {
    let (kind, selection) = argument
        .split_once(':')
        .ok_or_else(|| "expected `<cell|column|row>:<selection>`".to_string())?;
    let parse: fn(&str) -> Result<Selection, ValueError> = match kind {
        "cell" => Selection::parse_cell,
        "column" => Selection::parse_column,
        "row" => Selection::parse_row,
        other => return Err(format!("unknown selection kind `{other}`")),
    };
    anchored(selection, parse).map_err(|err| err.to_string())
}

fn number(argument: &str) -> Result<u32, String> {
    argument
        .parse()
        .map_err(|_| format!("`{argument}` is not a number"))
}

impl FromStr for Operation {
    type Err = SheetHistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match s.split_once('=') {
            Some((name, argument)) => (name, Some(argument)),
            None => (s, None),
        };

        let operation = match (name, argument) {
            ("clear-action", None) => Ok(Self::ClearAction),
            ("close", None) => Ok(Self::Close),
            ("delete", None) => Ok(Self::Delete),
            ("clear", None) => Ok(Self::Clear),
            ("freeze", None) => Ok(Self::Freeze),
            ("unfreeze", None) => Ok(Self::Unfreeze),
            ("menu", None) => Ok(Self::Menu(None)),
            ("menu", Some(selection)) => anchored(selection, Selection::parse_any)
                .map(|selection| Self::Menu(Some(selection)))
                .map_err(|err| err.to_string()),
            ("toolbar", None) => Ok(Self::Toolbar),
            ("reload", None) => Ok(Self::Reload),
            ("rename", None) => Ok(Self::Rename),
            ("create-label", None) => Ok(Self::CreateLabel),
            ("labels", None) => Ok(Self::Labels),
            ("select", Some(argument)) => select(argument).map(Self::Select),
            ("save", Some(text)) => Ok(Self::Save(text.to_string())),
            ("offset", Some(argument)) => number(argument).map(Self::Offset),
            ("count", Some(argument)) => number(argument).map(Self::Count),
            ("metadata", Some(property)) => property
                .parse()
                .map(Self::Metadata)
                .map_err(|err: ValueError| err.to_string()),
            ("select" | "save" | "offset" | "count" | "metadata", None) => {
                Err("missing `=<argument>`".to_string())
            }
            (_, Some(_)) if is_known(name) => Err("takes no argument".to_string()),
            _ => Err("unknown operation".to_string()),
        };

        operation.map_err(|message| SheetHistoryError::new_operation_error(s, message))
    }
}

fn is_known(name: &str) -> bool {
    matches!(
        name,
        "clear-action"
            | "close"
            | "delete"
            | "clear"
            | "freeze"
            | "unfreeze"
            | "toolbar"
            | "reload"
            | "rename"
            | "create-label"
            | "labels"
    )
}
