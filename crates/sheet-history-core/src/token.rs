//! History tokens.
//!
//! A [`HistoryToken`] is one point in the navigation state space of the
//! spreadsheet client: which spreadsheet is open, what is selected and which
//! dialog or action is active. Tokens are immutable. Transition methods on
//! [`HistoryToken`] return a new token, or the very same token when nothing
//! changes.
//!
//! The state itself is the closed [`TokenKind`] hierarchy. A token wraps a
//! validated kind together with its lazily rendered URL fragment; clones
//! share both, so the fragment is rendered at most once per token.

mod fragment;
mod transition;

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    error::HistoryTokenError,
    name::{FormName, PluginName, SpreadsheetId, SpreadsheetName},
    offset_count::OffsetAndCount,
    reference::{CellRef, LabelName},
    selection::{AnchoredSelection, Selection, SelectionKind},
    value::{
        BrowserFile, CellProperty, ClipboardOperation, ClipboardValueKind, Form,
        MetadataProperty, Navigation, SaveValue, SortComparators, StyleProperty, StyleValue,
        ValueKind,
    },
};

/// The spreadsheet a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadsheetContext {
    id: SpreadsheetId,
    name: SpreadsheetName,
}

impl SpreadsheetContext {
    pub fn new(id: SpreadsheetId, name: SpreadsheetName) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> SpreadsheetId {
        self.id
    }

    pub fn name(&self) -> &SpreadsheetName {
        &self.name
    }
}

/// Every state the client can be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A fragment that names no known state, kept verbatim.
    Unknown(String),
    SpreadsheetList(SpreadsheetListState),
    /// A spreadsheet whose name is not known yet.
    SpreadsheetLoad(SpreadsheetId),
    Spreadsheet(SpreadsheetContext, SpreadsheetState),
    Plugin(PluginState),
}

/// The spreadsheet list and its dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetListState {
    Select(OffsetAndCount),
    Reload(OffsetAndCount),
    RenameSelect(SpreadsheetId),
    RenameSave(SpreadsheetId, SpreadsheetName),
    Delete(SpreadsheetId),
}

/// States inside an open spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetState {
    Select,
    Reload,
    RenameSelect,
    RenameSave(SpreadsheetName),
    Delete,
    /// The viewport was moved from `home` by the listed navigations.
    Navigate(CellRef, Vec<Navigation>),
    Cell(AnchoredSelection, CellAction),
    Column(AnchoredSelection, ColumnOrRowAction),
    Row(AnchoredSelection, ColumnOrRowAction),
    Label(LabelState),
    Metadata(MetadataState),
    Form(FormState),
}

/// What is happening to a selected cell, cell range or label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellAction {
    Select,
    Clear,
    Delete,
    Freeze,
    Unfreeze,
    Menu,
    Toolbar,
    /// Labels pointing at the selection.
    Labels(OffsetAndCount),
    /// Cells referring to the selection.
    References(OffsetAndCount),
    Clipboard(ClipboardOperation, ClipboardValueKind),
    SortEdit(String),
    SortSave(SortComparators),
    PropertySelect(CellProperty),
    /// `None` clears the property.
    PropertySave(CellProperty, Option<SaveValue>),
}

/// What is happening to a selected column or row (or range of them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrRowAction {
    Select,
    Clear,
    Delete,
    Freeze,
    Unfreeze,
    Menu,
    Hide,
    Unhide,
    InsertAfter(u32),
    InsertBefore(u32),
    SortEdit(String),
    SortSave(SortComparators),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelState {
    Create,
    List(OffsetAndCount),
    /// The label dialog, optionally opened on an existing label.
    Select(Option<LabelName>),
    /// Points the label at a cell, a cell range or another label.
    Save(LabelName, Selection),
    Delete(LabelName),
    References(LabelName, OffsetAndCount),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    Select,
    PropertySelect(MetadataProperty),
    PropertySave(MetadataProperty, Option<SaveValue>),
    StyleSelect(StyleProperty),
    StyleSave(StyleProperty, Option<StyleValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    List(OffsetAndCount),
    Select(FormName),
    Save(FormName, Form),
    Delete(FormName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginState {
    ListSelect(OffsetAndCount),
    ListReload(OffsetAndCount),
    Select(PluginName),
    Save(PluginName, String),
    Delete(PluginName),
    /// A file inside the plugin archive, `/`-separated, or the root listing.
    FileView(PluginName, Option<String>),
    UploadSelect,
    UploadSave(BrowserFile),
}

fn check_selection_kind(
    selection: &AnchoredSelection,
    expected: SelectionKind,
) -> Result<(), HistoryTokenError> {
    if selection.kind() == expected {
        Ok(())
    } else {
        Err(HistoryTokenError::invalid_argument(format!(
            "expected a {expected} selection, got `{}`",
            selection.selection()
        )))
    }
}

fn check_freezable(selection: &AnchoredSelection) -> Result<(), HistoryTokenError> {
    if selection.selection().is_freezable() {
        Ok(())
    } else {
        Err(HistoryTokenError::invalid_state(format!(
            "`{}` cannot be frozen, it must begin at the first column or row",
            selection.selection()
        )))
    }
}

fn unexpected_value(kind: ValueKind, value: &SaveValue) -> HistoryTokenError {
    HistoryTokenError::invalid_argument(format!(
        "expected {kind}, got {} `{value}`",
        value.type_name()
    ))
}

fn check_value(kind: ValueKind, value: &SaveValue) -> Result<(), HistoryTokenError> {
    if kind.accepts(value) {
        Ok(())
    } else {
        Err(unexpected_value(kind, value))
    }
}

fn check_insert_count(count: u32) -> Result<(), HistoryTokenError> {
    if count == 0 {
        Err(HistoryTokenError::invalid_argument(
            "insert count must be at least 1",
        ))
    } else {
        Ok(())
    }
}

impl TokenKind {
    /// Checks every invariant [`HistoryToken::new`] enforces.
    ///
    /// # Errors
    ///
    /// See [`HistoryToken::new`].
    pub fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::Spreadsheet(_, state) => state.validate(),
            Self::Plugin(state) => state.validate(),
            Self::Unknown(_) | Self::SpreadsheetList(_) | Self::SpreadsheetLoad(_) => Ok(()),
        }
    }
}

impl SpreadsheetState {
    /// Checks the invariants of the state alone, see [`TokenKind::validate`].
    ///
    /// # Errors
    ///
    /// See [`HistoryToken::new`].
    pub fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::Cell(selection, action) => {
                check_selection_kind(selection, SelectionKind::Cell)?;
                match action {
                    CellAction::Freeze | CellAction::Unfreeze => check_freezable(selection),
                    CellAction::PropertySave(property, Some(value)) => {
                        check_value(property.value_kind(), value)
                    }
                    _ => Ok(()),
                }
            }
            Self::Column(selection, action) => {
                check_selection_kind(selection, SelectionKind::Column)?;
                action.validate(selection)
            }
            Self::Row(selection, action) => {
                check_selection_kind(selection, SelectionKind::Row)?;
                action.validate(selection)
            }
            Self::Label(state) => state.validate(),
            Self::Metadata(state) => state.validate(),
            Self::Form(state) => state.validate(),
            Self::Select
            | Self::Reload
            | Self::RenameSelect
            | Self::RenameSave(_)
            | Self::Delete
            | Self::Navigate(..) => Ok(()),
        }
    }
}

impl ColumnOrRowAction {
    fn validate(&self, selection: &AnchoredSelection) -> Result<(), HistoryTokenError> {
        match self {
            Self::Freeze | Self::Unfreeze => check_freezable(selection),
            Self::InsertAfter(count) | Self::InsertBefore(count) => check_insert_count(*count),
            Self::SortSave(comparators) => check_sort_keys(selection, comparators),
            _ => Ok(()),
        }
    }
}

/// Columns are sorted by the values in rows and rows by the values in columns.
fn check_sort_keys(
    selection: &AnchoredSelection,
    comparators: &SortComparators,
) -> Result<(), HistoryTokenError> {
    let expected = match selection.kind() {
        SelectionKind::Column => SelectionKind::Row,
        SelectionKind::Row => SelectionKind::Column,
        SelectionKind::Cell => return Ok(()),
    };
    if comparators.key_kind() == expected {
        Ok(())
    } else {
        Err(HistoryTokenError::invalid_argument(format!(
            "sorting a {} selection requires {expected} comparators, got `{comparators}`",
            selection.kind()
        )))
    }
}

impl LabelState {
    fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::Save(label, target) => match target {
                Selection::Cell(_) | Selection::CellRange(_) => Ok(()),
                Selection::Label(other) if other != label => Ok(()),
                Selection::Label(_) => Err(HistoryTokenError::invalid_argument(format!(
                    "label `{label}` cannot point at itself"
                ))),
                _ => Err(HistoryTokenError::invalid_argument(format!(
                    "label `{label}` must point at a cell, cell range or label, got `{target}`"
                ))),
            },
            _ => Ok(()),
        }
    }
}

impl MetadataState {
    fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::PropertySave(property, Some(value)) => check_value(property.value_kind(), value),
            Self::StyleSave(property, Some(value)) if !property.accepts(value) => {
                Err(HistoryTokenError::invalid_argument(format!(
                    "`{value}` is not a valid {property} value"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl FormState {
    fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::Save(name, form) if form.name() != name => {
                Err(HistoryTokenError::invalid_argument(format!(
                    "form `{}` cannot be saved as `{name}`",
                    form.name()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl PluginState {
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] for an empty save text
    /// or a file path with an empty component.
    pub fn validate(&self) -> Result<(), HistoryTokenError> {
        match self {
            Self::Save(name, text) if text.is_empty() => Err(HistoryTokenError::invalid_argument(
                format!("plugin `{name}` cannot be saved empty"),
            )),
            Self::FileView(name, Some(path)) if path.split('/').any(str::is_empty) => {
                Err(HistoryTokenError::invalid_argument(format!(
                    "invalid path `{path}` for plugin `{name}`"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug)]
struct Inner {
    kind: TokenKind,
    fragment: OnceLock<String>,
}

/// An immutable, cheaply clonable navigation state.
///
/// Two tokens are equal when their kinds are equal. Use
/// [`HistoryToken::ptr_eq`] to check whether an operation returned the very
/// same token.
#[derive(Clone)]
pub struct HistoryToken(Arc<Inner>);

impl HistoryToken {
    /// Creates a token after checking every invariant of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidState`] for a freeze or unfreeze of
    /// a selection that does not begin at the first column or row, and
    /// [`HistoryTokenError::InvalidArgument`] for any other violation, such as
    /// a save value of the wrong kind or a column state holding a cell.
    pub fn new(kind: TokenKind) -> Result<Self, HistoryTokenError> {
        kind.validate()?;
        Ok(Self::derive(kind))
    }

    /// Wraps a kind already known to be valid.
    pub(crate) fn derive(kind: TokenKind) -> Self {
        Self(Arc::new(Inner {
            kind,
            fragment: OnceLock::new(),
        }))
    }

    pub fn unknown(fragment: impl Into<String>) -> Self {
        Self::derive(TokenKind::Unknown(fragment.into()))
    }

    pub fn spreadsheet_list_select(offset_and_count: OffsetAndCount) -> Self {
        Self::derive(TokenKind::SpreadsheetList(SpreadsheetListState::Select(
            offset_and_count,
        )))
    }

    pub fn spreadsheet_load(id: SpreadsheetId) -> Self {
        Self::derive(TokenKind::SpreadsheetLoad(id))
    }

    pub fn spreadsheet_select(id: SpreadsheetId, name: SpreadsheetName) -> Self {
        Self::derive(TokenKind::Spreadsheet(
            SpreadsheetContext::new(id, name),
            SpreadsheetState::Select,
        ))
    }

    /// The cell, column or row select token for `selection`.
    pub fn selection_select(context: SpreadsheetContext, selection: AnchoredSelection) -> Self {
        Self::derive(TokenKind::Spreadsheet(context, select_state(selection)))
    }

    pub fn plugin_list_select(offset_and_count: OffsetAndCount) -> Self {
        Self::derive(TokenKind::Plugin(PluginState::ListSelect(offset_and_count)))
    }

    pub fn kind(&self) -> &TokenKind {
        &self.0.kind
    }

    /// Returns true when both handles refer to the same token.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// The canonical fragment, rendered on first use and cached.
    pub fn url_fragment(&self) -> &str {
        self.0.fragment.get_or_init(|| self.0.kind.to_string())
    }

    pub fn context(&self) -> Option<&SpreadsheetContext> {
        match self.kind() {
            TokenKind::Spreadsheet(context, _) => Some(context),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<SpreadsheetId> {
        match self.kind() {
            TokenKind::Spreadsheet(context, _) => Some(context.id),
            TokenKind::SpreadsheetLoad(id)
            | TokenKind::SpreadsheetList(
                SpreadsheetListState::RenameSelect(id)
                | SpreadsheetListState::RenameSave(id, _)
                | SpreadsheetListState::Delete(id),
            ) => Some(*id),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&SpreadsheetName> {
        self.context().map(SpreadsheetContext::name)
    }

    pub fn anchored_selection(&self) -> Option<&AnchoredSelection> {
        match self.kind() {
            TokenKind::Spreadsheet(
                _,
                SpreadsheetState::Cell(selection, _)
                | SpreadsheetState::Column(selection, _)
                | SpreadsheetState::Row(selection, _),
            ) => Some(selection),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.anchored_selection().map(AnchoredSelection::selection)
    }

    pub fn label_name(&self) -> Option<&LabelName> {
        match self.kind() {
            TokenKind::Spreadsheet(_, SpreadsheetState::Label(state)) => match state {
                LabelState::Select(name) => name.as_ref(),
                LabelState::Save(name, _)
                | LabelState::Delete(name)
                | LabelState::References(name, _) => Some(name),
                LabelState::Create | LabelState::List(_) => None,
            },
            _ => None,
        }
    }

    /// Pagination of list-style tokens.
    pub fn offset_and_count(&self) -> Option<OffsetAndCount> {
        match self.kind() {
            TokenKind::SpreadsheetList(
                SpreadsheetListState::Select(oc) | SpreadsheetListState::Reload(oc),
            )
            | TokenKind::Plugin(PluginState::ListSelect(oc) | PluginState::ListReload(oc)) => {
                Some(*oc)
            }
            TokenKind::Spreadsheet(_, state) => match state {
                SpreadsheetState::Cell(_, CellAction::Labels(oc) | CellAction::References(oc))
                | SpreadsheetState::Label(LabelState::List(oc) | LabelState::References(_, oc))
                | SpreadsheetState::Form(FormState::List(oc)) => Some(*oc),
                _ => None,
            },
            _ => None,
        }
    }
}

/// The select state for `selection`, by its kind.
pub(crate) fn select_state(selection: AnchoredSelection) -> SpreadsheetState {
    match selection.kind() {
        SelectionKind::Cell => SpreadsheetState::Cell(selection, CellAction::Select),
        SelectionKind::Column => SpreadsheetState::Column(selection, ColumnOrRowAction::Select),
        SelectionKind::Row => SpreadsheetState::Row(selection, ColumnOrRowAction::Select),
    }
}

impl PartialEq for HistoryToken {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.kind() == other.kind()
    }
}

impl Eq for HistoryToken {}

impl fmt::Debug for HistoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HistoryToken").field(self.kind()).finish()
    }
}

impl fmt::Display for HistoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_fragment())
    }
}

impl TryFrom<TokenKind> for HistoryToken {
    type Error = HistoryTokenError;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        Self::new(kind)
    }
}
