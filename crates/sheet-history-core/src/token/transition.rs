//! Transition operations.
//!
//! Every operation is a pure function of the current token and its
//! arguments. Operations that do not apply to a token return the same token
//! (`HistoryToken::ptr_eq` holds), as does any operation whose result would
//! equal the current token.

use crate::{
    error::HistoryTokenError,
    name::{FormName, SpreadsheetId, SpreadsheetName},
    offset_count::OffsetAndCount,
    reference::{CellRef, LabelName},
    selection::{AnchoredSelection, SelectionKind},
    value::{
        CellProperty, ClipboardOperation, ClipboardValueKind, MetadataProperty, Navigation,
        SaveValue, StyleProperty, ValueKind,
    },
};

use super::{
    CellAction, ColumnOrRowAction, FormState, HistoryToken, LabelState, MetadataState,
    PluginState, SpreadsheetContext, SpreadsheetListState, SpreadsheetState, TokenKind,
    check_freezable, check_insert_count, check_sort_keys, check_value, select_state,
    unexpected_value,
};

/// The menu state for `selection`, by its kind.
fn menu_state(selection: AnchoredSelection) -> SpreadsheetState {
    match selection.kind() {
        SelectionKind::Cell => SpreadsheetState::Cell(selection, CellAction::Menu),
        SelectionKind::Column => SpreadsheetState::Column(selection, ColumnOrRowAction::Menu),
        SelectionKind::Row => SpreadsheetState::Row(selection, ColumnOrRowAction::Menu),
    }
}

/// Saves sort comparators for a column or row selection.
fn column_or_row_sort(
    selection: &AnchoredSelection,
    value: Option<SaveValue>,
    state: fn(AnchoredSelection, ColumnOrRowAction) -> SpreadsheetState,
) -> Result<SpreadsheetState, HistoryTokenError> {
    let action = match value {
        None => ColumnOrRowAction::Select,
        Some(SaveValue::Comparators(comparators)) => {
            check_sort_keys(selection, &comparators)?;
            ColumnOrRowAction::SortSave(comparators)
        }
        Some(other) => return Err(unexpected_value(ValueKind::Comparators, &other)),
    };
    Ok(state(selection.clone(), action))
}

/// The state reached by saving `value` in `state`, or `None` when `state`
/// has nothing to save.
fn save_state(
    state: &SpreadsheetState,
    value: Option<SaveValue>,
) -> Result<Option<SpreadsheetState>, HistoryTokenError> {
    let state = match state {
        SpreadsheetState::Cell(
            selection,
            CellAction::PropertySelect(property) | CellAction::PropertySave(property, _),
        ) => {
            if let Some(value) = &value {
                check_value(property.value_kind(), value)?;
            }
            SpreadsheetState::Cell(selection.clone(), CellAction::PropertySave(*property, value))
        }
        SpreadsheetState::Cell(selection, CellAction::SortEdit(_) | CellAction::SortSave(_)) => {
            let action = match value {
                None => CellAction::Select,
                Some(SaveValue::Comparators(comparators)) => CellAction::SortSave(comparators),
                Some(other) => return Err(unexpected_value(ValueKind::Comparators, &other)),
            };
            SpreadsheetState::Cell(selection.clone(), action)
        }
        SpreadsheetState::Column(
            selection,
            ColumnOrRowAction::SortEdit(_) | ColumnOrRowAction::SortSave(_),
        ) => column_or_row_sort(selection, value, SpreadsheetState::Column)?,
        SpreadsheetState::Row(
            selection,
            ColumnOrRowAction::SortEdit(_) | ColumnOrRowAction::SortSave(_),
        ) => column_or_row_sort(selection, value, SpreadsheetState::Row)?,
        SpreadsheetState::RenameSelect | SpreadsheetState::RenameSave(_) => match value {
            None => SpreadsheetState::RenameSelect,
            Some(SaveValue::SpreadsheetName(name)) => SpreadsheetState::RenameSave(name),
            Some(other) => return Err(unexpected_value(ValueKind::SpreadsheetName, &other)),
        },
        SpreadsheetState::Label(LabelState::Select(Some(label)) | LabelState::Save(label, _)) => {
            let state = match value {
                None => LabelState::Select(Some(label.clone())),
                Some(SaveValue::Selection(target)) => LabelState::Save(label.clone(), target),
                Some(other) => return Err(unexpected_value(ValueKind::Selection, &other)),
            };
            state.validate()?;
            SpreadsheetState::Label(state)
        }
        SpreadsheetState::Metadata(
            MetadataState::PropertySelect(property) | MetadataState::PropertySave(property, _),
        ) => {
            if let Some(value) = &value {
                check_value(property.value_kind(), value)?;
            }
            SpreadsheetState::Metadata(MetadataState::PropertySave(*property, value))
        }
        SpreadsheetState::Metadata(
            MetadataState::StyleSelect(property) | MetadataState::StyleSave(property, _),
        ) => {
            let style = match value {
                None => None,
                Some(SaveValue::Style(style)) if property.accepts(&style) => Some(style),
                Some(other) => return Err(unexpected_value(ValueKind::Style(*property), &other)),
            };
            SpreadsheetState::Metadata(MetadataState::StyleSave(*property, style))
        }
        SpreadsheetState::Form(FormState::Select(name) | FormState::Save(name, _)) => {
            let state = match value {
                None => FormState::Select(name.clone()),
                Some(SaveValue::Form(form)) => FormState::Save(name.clone(), form),
                Some(other) => return Err(unexpected_value(ValueKind::Form, &other)),
            };
            state.validate()?;
            SpreadsheetState::Form(state)
        }
        _ => return Ok(None),
    };
    Ok(Some(state))
}

impl HistoryToken {
    /// Returns `self` when `kind` equals the current kind.
    fn replace(&self, kind: TokenKind) -> Self {
        if *self.kind() == kind {
            self.clone()
        } else {
            Self::derive(kind)
        }
    }

    fn with_state(&self, context: &SpreadsheetContext, state: SpreadsheetState) -> Self {
        self.replace(TokenKind::Spreadsheet(context.clone(), state))
    }

    /// Replaces the action of a cell, column or row token. A closure
    /// returning `None` leaves the token unchanged.
    fn map_selected(
        &self,
        cell: impl FnOnce(&CellAction) -> Option<CellAction>,
        column_or_row: impl FnOnce(&ColumnOrRowAction) -> Option<ColumnOrRowAction>,
    ) -> Self {
        let TokenKind::Spreadsheet(context, state) = self.kind() else {
            return self.clone();
        };
        let state = match state {
            SpreadsheetState::Cell(selection, action) => {
                cell(action).map(|action| SpreadsheetState::Cell(selection.clone(), action))
            }
            SpreadsheetState::Column(selection, action) => column_or_row(action)
                .map(|action| SpreadsheetState::Column(selection.clone(), action)),
            SpreadsheetState::Row(selection, action) => {
                column_or_row(action).map(|action| SpreadsheetState::Row(selection.clone(), action))
            }
            _ => None,
        };
        match state {
            Some(state) => self.with_state(context, state),
            None => self.clone(),
        }
    }

    /// Applies `f` to the state of a spreadsheet token. `None` leaves the
    /// token unchanged.
    fn map_spreadsheet(
        &self,
        f: impl FnOnce(&SpreadsheetState) -> Option<SpreadsheetState>,
    ) -> Self {
        match self.kind() {
            TokenKind::Spreadsheet(context, state) => match f(state) {
                Some(state) => self.with_state(context, state),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    fn map_offset_and_count(&self, f: impl FnOnce(OffsetAndCount) -> OffsetAndCount) -> Self {
        let kind = match self.kind() {
            TokenKind::SpreadsheetList(SpreadsheetListState::Select(oc)) => {
                TokenKind::SpreadsheetList(SpreadsheetListState::Select(f(*oc)))
            }
            TokenKind::SpreadsheetList(SpreadsheetListState::Reload(oc)) => {
                TokenKind::SpreadsheetList(SpreadsheetListState::Reload(f(*oc)))
            }
            TokenKind::Plugin(PluginState::ListSelect(oc)) => {
                TokenKind::Plugin(PluginState::ListSelect(f(*oc)))
            }
            TokenKind::Plugin(PluginState::ListReload(oc)) => {
                TokenKind::Plugin(PluginState::ListReload(f(*oc)))
            }
            TokenKind::Spreadsheet(context, state) => {
                let state = match state {
                    SpreadsheetState::Cell(selection, CellAction::Labels(oc)) => {
                        SpreadsheetState::Cell(selection.clone(), CellAction::Labels(f(*oc)))
                    }
                    SpreadsheetState::Cell(selection, CellAction::References(oc)) => {
                        SpreadsheetState::Cell(selection.clone(), CellAction::References(f(*oc)))
                    }
                    SpreadsheetState::Label(LabelState::List(oc)) => {
                        SpreadsheetState::Label(LabelState::List(f(*oc)))
                    }
                    SpreadsheetState::Label(LabelState::References(label, oc)) => {
                        SpreadsheetState::Label(LabelState::References(label.clone(), f(*oc)))
                    }
                    SpreadsheetState::Form(FormState::List(oc)) => {
                        SpreadsheetState::Form(FormState::List(f(*oc)))
                    }
                    _ => return self.clone(),
                };
                TokenKind::Spreadsheet(context.clone(), state)
            }
            _ => return self.clone(),
        };
        self.replace(kind)
    }

    /// Moves to the select token of `selection`, or leaves the selection when
    /// `None`.
    ///
    /// Tokens outside a named spreadsheet are returned unchanged.
    pub fn set_selection(&self, selection: Option<AnchoredSelection>) -> Self {
        let current = self.anchored_selection();
        self.map_spreadsheet(|_| match selection {
            None if current.is_some() => Some(SpreadsheetState::Select),
            None => None,
            Some(selection) if current == Some(&selection) => None,
            Some(selection) => Some(select_state(selection)),
        })
    }

    /// Returns to the nearest select token, dropping any open action.
    pub fn clear_action(&self) -> Self {
        let kind = match self.kind() {
            TokenKind::SpreadsheetList(state) => TokenKind::SpreadsheetList(match state {
                SpreadsheetListState::Reload(oc) => SpreadsheetListState::Select(*oc),
                SpreadsheetListState::RenameSave(id, _) => SpreadsheetListState::RenameSelect(*id),
                SpreadsheetListState::Delete(_) => {
                    SpreadsheetListState::Select(OffsetAndCount::EMPTY)
                }
                SpreadsheetListState::Select(_) | SpreadsheetListState::RenameSelect(_) => {
                    return self.clone();
                }
            }),
            TokenKind::Spreadsheet(context, state) => {
                let state = match state {
                    SpreadsheetState::Cell(selection, action) if *action != CellAction::Select => {
                        SpreadsheetState::Cell(selection.clone(), CellAction::Select)
                    }
                    SpreadsheetState::Column(selection, action)
                        if *action != ColumnOrRowAction::Select =>
                    {
                        SpreadsheetState::Column(selection.clone(), ColumnOrRowAction::Select)
                    }
                    SpreadsheetState::Row(selection, action)
                        if *action != ColumnOrRowAction::Select =>
                    {
                        SpreadsheetState::Row(selection.clone(), ColumnOrRowAction::Select)
                    }
                    SpreadsheetState::Reload
                    | SpreadsheetState::Delete
                    | SpreadsheetState::Navigate(..) => SpreadsheetState::Select,
                    SpreadsheetState::RenameSave(_) => SpreadsheetState::RenameSelect,
                    SpreadsheetState::Label(
                        LabelState::Save(label, _)
                        | LabelState::Delete(label)
                        | LabelState::References(label, _),
                    ) => SpreadsheetState::Label(LabelState::Select(Some(label.clone()))),
                    SpreadsheetState::Metadata(state) if *state != MetadataState::Select => {
                        SpreadsheetState::Metadata(MetadataState::Select)
                    }
                    SpreadsheetState::Form(FormState::Save(name, _) | FormState::Delete(name)) => {
                        SpreadsheetState::Form(FormState::Select(name.clone()))
                    }
                    _ => return self.clone(),
                };
                TokenKind::Spreadsheet(context.clone(), state)
            }
            TokenKind::Plugin(state) => TokenKind::Plugin(match state {
                PluginState::ListReload(oc) => PluginState::ListSelect(*oc),
                PluginState::Save(name, _)
                | PluginState::Delete(name)
                | PluginState::FileView(name, _) => PluginState::Select(name.clone()),
                PluginState::UploadSave(_) => PluginState::UploadSelect,
                PluginState::ListSelect(_) | PluginState::Select(_) | PluginState::UploadSelect => {
                    return self.clone();
                }
            }),
            TokenKind::Unknown(_) | TokenKind::SpreadsheetLoad(_) => return self.clone(),
        };
        self.replace(kind)
    }

    /// Closes the open dialog or action.
    ///
    /// Cell, column and row actions return to their select token. Spreadsheet
    /// dialogs (labels, metadata, forms, rename, delete, navigate) return to
    /// the spreadsheet select token, spreadsheet list dialogs to the list and
    /// plugin dialogs to the plugin list.
    pub fn close(&self) -> Self {
        let kind = match self.kind() {
            TokenKind::SpreadsheetList(state) => TokenKind::SpreadsheetList(match state {
                SpreadsheetListState::Select(_) => return self.clone(),
                SpreadsheetListState::Reload(oc) => SpreadsheetListState::Select(*oc),
                _ => SpreadsheetListState::Select(OffsetAndCount::EMPTY),
            }),
            TokenKind::Spreadsheet(context, state) => {
                let state = match state {
                    SpreadsheetState::Select => return self.clone(),
                    SpreadsheetState::Cell(selection, _)
                    | SpreadsheetState::Column(selection, _)
                    | SpreadsheetState::Row(selection, _) => select_state(selection.clone()),
                    _ => SpreadsheetState::Select,
                };
                TokenKind::Spreadsheet(context.clone(), state)
            }
            TokenKind::Plugin(state) => match state {
                PluginState::ListSelect(_) => TokenKind::SpreadsheetList(
                    SpreadsheetListState::Select(OffsetAndCount::EMPTY),
                ),
                PluginState::ListReload(oc) => TokenKind::Plugin(PluginState::ListSelect(*oc)),
                _ => TokenKind::Plugin(PluginState::ListSelect(OffsetAndCount::EMPTY)),
            },
            TokenKind::Unknown(_) | TokenKind::SpreadsheetLoad(_) => return self.clone(),
        };
        self.replace(kind)
    }

    /// Deletes whatever the token is focused on.
    ///
    /// Property tokens save an absent value. Cell, column and row tokens
    /// become delete actions. Label, form and plugin tokens with a name become
    /// their delete token, and the spreadsheet select token deletes the
    /// spreadsheet.
    pub fn delete(&self) -> Self {
        match self.kind() {
            TokenKind::Spreadsheet(..) => self
                .map_spreadsheet(|state| {
                    Some(match state {
                        SpreadsheetState::Select => SpreadsheetState::Delete,
                        SpreadsheetState::Cell(
                            selection,
                            CellAction::PropertySelect(property)
                            | CellAction::PropertySave(property, _),
                        ) => SpreadsheetState::Cell(
                            selection.clone(),
                            CellAction::PropertySave(*property, None),
                        ),
                        SpreadsheetState::Cell(selection, _) => {
                            SpreadsheetState::Cell(selection.clone(), CellAction::Delete)
                        }
                        SpreadsheetState::Column(selection, _) => {
                            SpreadsheetState::Column(selection.clone(), ColumnOrRowAction::Delete)
                        }
                        SpreadsheetState::Row(selection, _) => {
                            SpreadsheetState::Row(selection.clone(), ColumnOrRowAction::Delete)
                        }
                        SpreadsheetState::Label(
                            LabelState::Select(Some(label))
                            | LabelState::Save(label, _)
                            | LabelState::References(label, _),
                        ) => SpreadsheetState::Label(LabelState::Delete(label.clone())),
                        SpreadsheetState::Metadata(
                            MetadataState::PropertySelect(property)
                            | MetadataState::PropertySave(property, _),
                        ) => SpreadsheetState::Metadata(MetadataState::PropertySave(
                            *property, None,
                        )),
                        SpreadsheetState::Metadata(
                            MetadataState::StyleSelect(property)
                            | MetadataState::StyleSave(property, _),
                        ) => {
                            SpreadsheetState::Metadata(MetadataState::StyleSave(*property, None))
                        }
                        SpreadsheetState::Form(
                            FormState::Select(name) | FormState::Save(name, _),
                        ) => SpreadsheetState::Form(FormState::Delete(name.clone())),
                        _ => return None,
                    })
                }),
            TokenKind::Plugin(
                PluginState::Select(name)
                | PluginState::Save(name, _)
                | PluginState::FileView(name, _),
            ) => Self::derive(TokenKind::Plugin(PluginState::Delete(name.clone()))),
            _ => self.clone(),
        }
    }

    /// Opens the clear action on the selection.
    pub fn clear(&self) -> Self {
        self.map_selected(
            |_| Some(CellAction::Clear),
            |_| Some(ColumnOrRowAction::Clear),
        )
    }

    /// Opens the freeze action on the selection.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidState`] when the selection does not
    /// begin at the first column or row.
    pub fn freeze(&self) -> Result<Self, HistoryTokenError> {
        if let Some(selection) = self.anchored_selection() {
            check_freezable(selection)?;
        }
        Ok(self.map_selected(
            |_| Some(CellAction::Freeze),
            |_| Some(ColumnOrRowAction::Freeze),
        ))
    }

    /// Opens the unfreeze action on the selection.
    ///
    /// # Errors
    ///
    /// See [`HistoryToken::freeze`].
    pub fn unfreeze(&self) -> Result<Self, HistoryTokenError> {
        if let Some(selection) = self.anchored_selection() {
            check_freezable(selection)?;
        }
        Ok(self.map_selected(
            |_| Some(CellAction::Unfreeze),
            |_| Some(ColumnOrRowAction::Unfreeze),
        ))
    }

    /// Opens the context menu.
    ///
    /// A requested selection inside the current one keeps the current
    /// selection; any other selection replaces it before the menu opens.
    /// `None` opens the menu on the current selection.
    pub fn menu(&self, selection: Option<AnchoredSelection>) -> Self {
        let current = self.anchored_selection();
        let selection = match (current, selection) {
            (Some(current), Some(requested))
                if current.selection().contains(requested.selection()) =>
            {
                current.clone()
            }
            (_, Some(requested)) => requested,
            (Some(current), None) => current.clone(),
            (None, None) => return self.clone(),
        };
        self.map_spreadsheet(|_| Some(menu_state(selection)))
    }

    /// Opens the toolbar on a cell selection.
    pub fn toolbar(&self) -> Self {
        self.map_selected(|_| Some(CellAction::Toolbar), |_| None)
    }

    pub fn hide(&self) -> Self {
        self.map_selected(|_| None, |_| Some(ColumnOrRowAction::Hide))
    }

    pub fn unhide(&self) -> Self {
        self.map_selected(|_| None, |_| Some(ColumnOrRowAction::Unhide))
    }

    /// Inserts `count` columns or rows after the selection.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] when `count` is zero.
    pub fn insert_after(&self, count: u32) -> Result<Self, HistoryTokenError> {
        check_insert_count(count)?;
        Ok(self.map_selected(|_| None, |_| Some(ColumnOrRowAction::InsertAfter(count))))
    }

    /// Inserts `count` columns or rows before the selection.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] when `count` is zero.
    pub fn insert_before(&self, count: u32) -> Result<Self, HistoryTokenError> {
        check_insert_count(count)?;
        Ok(self.map_selected(|_| None, |_| Some(ColumnOrRowAction::InsertBefore(count))))
    }

    pub fn set_clipboard(&self, operation: ClipboardOperation, kind: ClipboardValueKind) -> Self {
        self.map_selected(|_| Some(CellAction::Clipboard(operation, kind)), |_| None)
    }

    /// Opens the sort editor with `text` as the comparators typed so far.
    pub fn set_sort_edit(&self, text: &str) -> Self {
        self.map_selected(
            |_| Some(CellAction::SortEdit(text.to_string())),
            |_| Some(ColumnOrRowAction::SortEdit(text.to_string())),
        )
    }

    /// Opens the editor of `property` on a cell selection.
    pub fn set_cell_property(&self, property: CellProperty) -> Self {
        self.map_selected(|_| Some(CellAction::PropertySelect(property)), |_| None)
    }

    /// The kind of value [`HistoryToken::set_save_value`] accepts here.
    pub fn save_value_kind(&self) -> Option<ValueKind> {
        match self.kind() {
            TokenKind::SpreadsheetList(
                SpreadsheetListState::RenameSelect(_) | SpreadsheetListState::RenameSave(..),
            ) => Some(ValueKind::SpreadsheetName),
            TokenKind::Spreadsheet(_, state) => match state {
                SpreadsheetState::Cell(
                    _,
                    CellAction::PropertySelect(property) | CellAction::PropertySave(property, _),
                ) => Some(property.value_kind()),
                SpreadsheetState::Cell(_, CellAction::SortEdit(_) | CellAction::SortSave(_))
                | SpreadsheetState::Column(
                    _,
                    ColumnOrRowAction::SortEdit(_) | ColumnOrRowAction::SortSave(_),
                )
                | SpreadsheetState::Row(
                    _,
                    ColumnOrRowAction::SortEdit(_) | ColumnOrRowAction::SortSave(_),
                ) => Some(ValueKind::Comparators),
                SpreadsheetState::RenameSelect | SpreadsheetState::RenameSave(_) => {
                    Some(ValueKind::SpreadsheetName)
                }
                SpreadsheetState::Label(
                    LabelState::Select(Some(_)) | LabelState::Save(..),
                ) => Some(ValueKind::Selection),
                SpreadsheetState::Metadata(
                    MetadataState::PropertySelect(property)
                    | MetadataState::PropertySave(property, _),
                ) => Some(property.value_kind()),
                SpreadsheetState::Metadata(
                    MetadataState::StyleSelect(property) | MetadataState::StyleSave(property, _),
                ) => Some(ValueKind::Style(*property)),
                SpreadsheetState::Form(FormState::Select(_) | FormState::Save(..)) => {
                    Some(ValueKind::Form)
                }
                _ => None,
            },
            TokenKind::Plugin(PluginState::Select(_) | PluginState::Save(..)) => {
                Some(ValueKind::Text)
            }
            TokenKind::Plugin(PluginState::UploadSelect | PluginState::UploadSave(_)) => {
                Some(ValueKind::File)
            }
            _ => None,
        }
    }

    /// Saves `value`, or clears the saved value when `None`.
    ///
    /// Property tokens keep an absent value as "save nothing"; every other
    /// save target returns to its select token when given `None`. Tokens
    /// without a save step are returned unchanged by `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] when `value` is not of
    /// the kind reported by [`HistoryToken::save_value_kind`] or breaks an
    /// invariant of the save token, such as a column sort keyed by columns.
    /// A value given to a token without a save step is rejected too.
    pub fn set_save_value(&self, value: Option<SaveValue>) -> Result<Self, HistoryTokenError> {
        let kind = match self.kind() {
            TokenKind::SpreadsheetList(
                SpreadsheetListState::RenameSelect(id) | SpreadsheetListState::RenameSave(id, _),
            ) => TokenKind::SpreadsheetList(match value {
                None => SpreadsheetListState::RenameSelect(*id),
                Some(SaveValue::SpreadsheetName(name)) => {
                    SpreadsheetListState::RenameSave(*id, name)
                }
                Some(other) => return Err(unexpected_value(ValueKind::SpreadsheetName, &other)),
            }),
            TokenKind::Spreadsheet(context, state) => match save_state(state, value.clone())? {
                Some(state) => TokenKind::Spreadsheet(context.clone(), state),
                None => return self.without_save(value),
            },
            TokenKind::Plugin(PluginState::Select(name) | PluginState::Save(name, _)) => {
                TokenKind::Plugin(match value {
                    Some(SaveValue::Text(text)) if !text.is_empty() => {
                        PluginState::Save(name.clone(), text)
                    }
                    None | Some(SaveValue::Text(_)) => PluginState::Select(name.clone()),
                    Some(other) => return Err(unexpected_value(ValueKind::Text, &other)),
                })
            }
            TokenKind::Plugin(PluginState::UploadSelect | PluginState::UploadSave(_)) => {
                TokenKind::Plugin(match value {
                    None => PluginState::UploadSelect,
                    Some(SaveValue::File(file)) => PluginState::UploadSave(file),
                    Some(other) => return Err(unexpected_value(ValueKind::File, &other)),
                })
            }
            _ => return self.without_save(value),
        };
        Ok(self.replace(kind))
    }

    fn without_save(&self, value: Option<SaveValue>) -> Result<Self, HistoryTokenError> {
        match value {
            None => Ok(self.clone()),
            Some(value) => Err(HistoryTokenError::invalid_argument(format!(
                "`{self}` has nothing to save, got {} `{value}`",
                value.type_name()
            ))),
        }
    }

    /// Parses `text` with [`HistoryToken::save_value_kind`] and saves it. An
    /// empty text saves nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] when `text` does not
    /// parse or the token has no save step, see also
    /// [`HistoryToken::set_save_value`].
    pub fn set_save_string_value(&self, text: &str) -> Result<Self, HistoryTokenError> {
        if text.is_empty() {
            return self.set_save_value(None);
        }
        match self.save_value_kind() {
            Some(kind) => self.set_save_value(Some(kind.parse(text)?)),
            None => Err(HistoryTokenError::invalid_argument(format!(
                "`{self}` has nothing to save, got `{text}`"
            ))),
        }
    }

    /// Opens the metadata editor of `property`.
    pub fn set_metadata_property_name(&self, property: MetadataProperty) -> Self {
        self.map_spreadsheet(|_| {
            Some(SpreadsheetState::Metadata(MetadataState::PropertySelect(
                property,
            )))
        })
    }

    /// Opens the metadata editor of the default style `property`.
    pub fn set_metadata_style_property(&self, property: StyleProperty) -> Self {
        self.map_spreadsheet(|_| {
            Some(SpreadsheetState::Metadata(MetadataState::StyleSelect(
                property,
            )))
        })
    }

    /// Moves to spreadsheet `id` named `name`.
    ///
    /// Within the same spreadsheet the state is kept unless a different
    /// selection is given. Any other spreadsheet starts at its select token
    /// or the select token of `selection`. Plugin tokens are unchanged.
    pub fn set_id_name_selection(
        &self,
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: Option<AnchoredSelection>,
    ) -> Self {
        let context = SpreadsheetContext::new(id, name);
        let state = match self.kind() {
            TokenKind::Plugin(_) => return self.clone(),
            TokenKind::Spreadsheet(current, state) if current.id() == id => match selection {
                Some(selection) if self.anchored_selection() != Some(&selection) => {
                    select_state(selection)
                }
                _ => state.clone(),
            },
            _ => selection.map_or(SpreadsheetState::Select, select_state),
        };
        self.replace(TokenKind::Spreadsheet(context, state))
    }

    /// Opens the rename dialog of the current spreadsheet.
    pub fn rename(&self) -> Self {
        match self.kind() {
            TokenKind::Spreadsheet(..) => {
                self.map_spreadsheet(|_| Some(SpreadsheetState::RenameSelect))
            }
            TokenKind::SpreadsheetLoad(id) => Self::derive(TokenKind::SpreadsheetList(
                SpreadsheetListState::RenameSelect(*id),
            )),
            _ => self.clone(),
        }
    }

    pub fn create_label(&self) -> Self {
        self.map_spreadsheet(|_| Some(SpreadsheetState::Label(LabelState::Create)))
    }

    /// Opens the label dialog, on `label` if given.
    pub fn set_label_name(&self, label: Option<LabelName>) -> Self {
        let current = self.label_name();
        self.map_spreadsheet(|state| match state {
            SpreadsheetState::Label(LabelState::Create | LabelState::List(_)) => {
                Some(SpreadsheetState::Label(LabelState::Select(label)))
            }
            SpreadsheetState::Label(_) if current == label.as_ref() => None,
            _ => Some(SpreadsheetState::Label(LabelState::Select(label))),
        })
    }

    /// Lists labels: those pointing at a cell selection, otherwise all
    /// labels of the spreadsheet.
    pub fn set_labels(&self, offset_and_count: OffsetAndCount) -> Self {
        self.map_spreadsheet(|state| {
            Some(match state {
                SpreadsheetState::Cell(selection, _) => {
                    SpreadsheetState::Cell(selection.clone(), CellAction::Labels(offset_and_count))
                }
                _ => SpreadsheetState::Label(LabelState::List(offset_and_count)),
            })
        })
    }

    /// Lists the cells referring to a cell selection or a label.
    pub fn set_references(&self, offset_and_count: OffsetAndCount) -> Self {
        let label = self.label_name().cloned();
        self.map_spreadsheet(|state| match (state, label) {
            (SpreadsheetState::Cell(selection, _), _) => Some(SpreadsheetState::Cell(
                selection.clone(),
                CellAction::References(offset_and_count),
            )),
            (SpreadsheetState::Label(_), Some(label)) => Some(SpreadsheetState::Label(
                LabelState::References(label, offset_and_count),
            )),
            _ => None,
        })
    }

    /// Opens form `name`.
    pub fn set_form_name(&self, name: FormName) -> Self {
        self.map_spreadsheet(|state| match state {
            SpreadsheetState::Form(
                FormState::Select(current)
                | FormState::Save(current, _)
                | FormState::Delete(current),
            ) if *current == name => None,
            _ => Some(SpreadsheetState::Form(FormState::Select(name))),
        })
    }

    /// Reloads the spreadsheet list, the plugin list or the open spreadsheet.
    pub fn reload(&self) -> Self {
        let kind = match self.kind() {
            TokenKind::SpreadsheetList(
                SpreadsheetListState::Select(oc) | SpreadsheetListState::Reload(oc),
            ) => TokenKind::SpreadsheetList(SpreadsheetListState::Reload(*oc)),
            TokenKind::SpreadsheetList(_) => TokenKind::SpreadsheetList(
                SpreadsheetListState::Reload(OffsetAndCount::EMPTY),
            ),
            TokenKind::Plugin(PluginState::ListSelect(oc) | PluginState::ListReload(oc)) => {
                TokenKind::Plugin(PluginState::ListReload(*oc))
            }
            TokenKind::Spreadsheet(context, _) => {
                TokenKind::Spreadsheet(context.clone(), SpreadsheetState::Reload)
            }
            _ => return self.clone(),
        };
        self.replace(kind)
    }

    /// Records viewport movement starting at `home`.
    pub fn navigation(&self, home: CellRef, navigations: Vec<Navigation>) -> Self {
        self.map_spreadsheet(|_| Some(SpreadsheetState::Navigate(home, navigations)))
    }

    /// Changes the offset of a list token.
    pub fn set_offset(&self, offset: Option<u32>) -> Self {
        self.map_offset_and_count(|oc| oc.with_offset(offset))
    }

    /// Changes the count of a list token.
    pub fn set_count(&self, count: Option<u32>) -> Self {
        self.map_offset_and_count(|oc| oc.with_count(count))
    }
}
