//! Rendering tokens as URL fragments.
//!
//! Keywords are written as-is. Every free-form value (names, texts, JSON
//! payloads) is percent-encoded into exactly one segment.

use std::fmt;

use crate::{encoding::encode_segment, value::Navigation};

use super::{
    CellAction, ColumnOrRowAction, FormState, LabelState, MetadataState, PluginState,
    SpreadsheetListState, SpreadsheetState, TokenKind,
};

/// Writes `/` followed by the encoded text of `value`.
fn segment(f: &mut fmt::Formatter<'_>, value: &impl fmt::Display) -> fmt::Result {
    write!(f, "/{}", encode_segment(&value.to_string()))
}

/// Writes `/save/` followed by the encoded value, if any.
fn save(f: &mut fmt::Formatter<'_>, value: Option<&impl fmt::Display>) -> fmt::Result {
    f.write_str("/save/")?;
    match value {
        Some(value) => f.write_str(&encode_segment(&value.to_string())),
        None => Ok(()),
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(fragment) => f.write_str(fragment),
            Self::SpreadsheetList(state) => write!(f, "{state}"),
            Self::SpreadsheetLoad(id) => write!(f, "/{id}"),
            Self::Spreadsheet(context, state) => {
                write!(f, "/{}", context.id())?;
                segment(f, context.name())?;
                write!(f, "{state}")
            }
            Self::Plugin(state) => write!(f, "{state}"),
        }
    }
}

impl fmt::Display for SpreadsheetListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(oc) => write!(f, "/*{oc}"),
            Self::Reload(oc) => write!(f, "/*{oc}/reload"),
            Self::RenameSelect(id) => write!(f, "/rename/{id}"),
            Self::RenameSave(id, name) => {
                write!(f, "/rename/{id}/save")?;
                segment(f, name)
            }
            Self::Delete(id) => write!(f, "/delete/{id}"),
        }
    }
}

impl fmt::Display for SpreadsheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => Ok(()),
            Self::Reload => f.write_str("/reload"),
            Self::RenameSelect => f.write_str("/rename"),
            Self::RenameSave(name) => {
                f.write_str("/rename/save")?;
                segment(f, name)
            }
            Self::Delete => f.write_str("/delete"),
            Self::Navigate(home, navigations) => {
                write!(f, "/navigate/{home}")?;
                if navigations.is_empty() {
                    Ok(())
                } else {
                    segment(f, &Navigation::list_to_string(navigations))
                }
            }
            Self::Cell(selection, action) => write!(f, "/cell/{selection}{action}"),
            Self::Column(selection, action) => write!(f, "/column/{selection}{action}"),
            Self::Row(selection, action) => write!(f, "/row/{selection}{action}"),
            Self::Label(state) => write!(f, "{state}"),
            Self::Metadata(state) => write!(f, "{state}"),
            Self::Form(state) => write!(f, "{state}"),
        }
    }
}

/// Writes `/sort/edit[/<text>]`.
fn sort_edit(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("/sort/edit")?;
    if text.is_empty() {
        Ok(())
    } else {
        segment(f, &text)
    }
}

impl fmt::Display for CellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => Ok(()),
            Self::Clear => f.write_str("/clear"),
            Self::Delete => f.write_str("/delete"),
            Self::Freeze => f.write_str("/freeze"),
            Self::Unfreeze => f.write_str("/unfreeze"),
            Self::Menu => f.write_str("/menu"),
            Self::Toolbar => f.write_str("/toolbar"),
            Self::Labels(oc) => write!(f, "/labels{oc}"),
            Self::References(oc) => write!(f, "/references{oc}"),
            Self::Clipboard(operation, kind) => write!(f, "/{operation}/{kind}"),
            Self::SortEdit(text) => sort_edit(f, text),
            Self::SortSave(comparators) => {
                f.write_str("/sort/save")?;
                segment(f, comparators)
            }
            Self::PropertySelect(property) => write!(f, "/{property}"),
            Self::PropertySave(property, value) => {
                write!(f, "/{property}")?;
                save(f, value.as_ref())
            }
        }
    }
}

impl fmt::Display for ColumnOrRowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => Ok(()),
            Self::Clear => f.write_str("/clear"),
            Self::Delete => f.write_str("/delete"),
            Self::Freeze => f.write_str("/freeze"),
            Self::Unfreeze => f.write_str("/unfreeze"),
            Self::Menu => f.write_str("/menu"),
            Self::Hide => f.write_str("/hide"),
            Self::Unhide => f.write_str("/unhide"),
            Self::InsertAfter(count) => write!(f, "/insertAfter/{count}"),
            Self::InsertBefore(count) => write!(f, "/insertBefore/{count}"),
            Self::SortEdit(text) => sort_edit(f, text),
            Self::SortSave(comparators) => {
                f.write_str("/sort/save")?;
                segment(f, comparators)
            }
        }
    }
}

impl fmt::Display for LabelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("/create-label"),
            Self::List(oc) => write!(f, "/label/*{oc}"),
            Self::Select(None) => f.write_str("/label"),
            Self::Select(Some(label)) => write!(f, "/label/{label}"),
            Self::Save(label, target) => {
                write!(f, "/label/{label}")?;
                save(f, Some(target))
            }
            Self::Delete(label) => write!(f, "/label/{label}/delete"),
            Self::References(label, oc) => write!(f, "/label/{label}/references{oc}"),
        }
    }
}

impl fmt::Display for MetadataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/metadata")?;
        match self {
            Self::Select => Ok(()),
            Self::PropertySelect(property) => write!(f, "/{property}"),
            Self::PropertySave(property, value) => {
                write!(f, "/{property}")?;
                save(f, value.as_ref())
            }
            Self::StyleSelect(property) => write!(f, "/style/{property}"),
            Self::StyleSave(property, value) => {
                write!(f, "/style/{property}")?;
                save(f, value.as_ref())
            }
        }
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(oc) => write!(f, "/form/*{oc}"),
            Self::Select(name) => write!(f, "/form/{name}"),
            Self::Save(name, form) => {
                write!(f, "/form/{name}/save")?;
                segment(f, form)
            }
            Self::Delete(name) => write!(f, "/form/{name}/delete"),
        }
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListSelect(oc) => write!(f, "/plugin/*{oc}"),
            Self::ListReload(oc) => write!(f, "/plugin/*{oc}/reload"),
            Self::Select(name) => write!(f, "/plugin/{name}"),
            Self::Save(name, text) => {
                write!(f, "/plugin/{name}/save")?;
                segment(f, text)
            }
            Self::Delete(name) => write!(f, "/plugin/{name}/delete"),
            Self::FileView(name, path) => {
                write!(f, "/plugin/{name}/file")?;
                for component in path.iter().flat_map(|path| path.split('/')) {
                    segment(f, &component)?;
                }
                Ok(())
            }
            Self::UploadSelect => f.write_str("/plugin-upload"),
            Self::UploadSave(file) => {
                f.write_str("/plugin-upload/save")?;
                segment(f, file)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        name::{PluginName, SpreadsheetId, SpreadsheetName},
        offset_count::OffsetAndCount,
        selection::{Anchor, AnchoredSelection, Selection},
        token::SpreadsheetContext,
        value::{CellProperty, SaveValue, StyleProperty},
    };

    fn spreadsheet(state: SpreadsheetState) -> String {
        TokenKind::Spreadsheet(
            SpreadsheetContext::new(
                SpreadsheetId::new(123),
                SpreadsheetName::new("SpreadsheetName456").unwrap(),
            ),
            state,
        )
        .to_string()
    }

    fn cell(text: &str, anchor: Anchor) -> AnchoredSelection {
        AnchoredSelection::new(Selection::parse_cell(text).unwrap(), anchor).unwrap()
    }

    #[test]
    fn test_list_fragments() {
        assert_eq!(
            SpreadsheetListState::Select(OffsetAndCount::EMPTY).to_string(),
            "/*"
        );
        assert_eq!(
            SpreadsheetListState::Reload(OffsetAndCount::new(Some(1), Some(2))).to_string(),
            "/*/offset/1/count/2/reload"
        );
        assert_eq!(
            SpreadsheetListState::RenameSave(
                SpreadsheetId::new(7),
                SpreadsheetName::new("Q1 / Q2").unwrap()
            )
            .to_string(),
            "/rename/7/save/Q1%20%2F%20Q2"
        );
    }

    #[test]
    fn test_cell_fragments() {
        assert_eq!(
            spreadsheet(SpreadsheetState::Cell(
                cell("B2:C3", Anchor::TopLeft),
                CellAction::Clear
            )),
            "/123/SpreadsheetName456/cell/B2:C3/top-left/clear"
        );
        assert_eq!(
            spreadsheet(SpreadsheetState::Cell(
                cell("A1", Anchor::None),
                CellAction::PropertySave(
                    CellProperty::Formula,
                    Some(SaveValue::Text("=12+3".to_string()))
                )
            )),
            "/123/SpreadsheetName456/cell/A1/formula/save/=12%2B3"
        );
        assert_eq!(
            spreadsheet(SpreadsheetState::Cell(
                cell("A1", Anchor::None),
                CellAction::PropertySave(CellProperty::Style(StyleProperty::Color), None)
            )),
            "/123/SpreadsheetName456/cell/A1/style/color/save/"
        );
    }

    #[test]
    fn test_metadata_and_navigate_fragments() {
        assert_eq!(
            spreadsheet(SpreadsheetState::Metadata(MetadataState::StyleSelect(
                StyleProperty::FontSize
            ))),
            "/123/SpreadsheetName456/metadata/style/font-size"
        );
        assert_eq!(
            spreadsheet(SpreadsheetState::Navigate(
                "B3".parse().unwrap(),
                Navigation::parse_list("right 100px").unwrap()
            )),
            "/123/SpreadsheetName456/navigate/B3/right%20100px"
        );
    }

    #[test]
    fn test_plugin_fragments() {
        let name = PluginName::new("TestPlugin").unwrap();
        assert_eq!(
            PluginState::ListSelect(OffsetAndCount::new(Some(10), Some(20))).to_string(),
            "/plugin/*/offset/10/count/20"
        );
        assert_eq!(
            PluginState::FileView(name.clone(), Some("dir/read me.txt".to_string())).to_string(),
            "/plugin/TestPlugin/file/dir/read%20me.txt"
        );
        assert_eq!(
            PluginState::FileView(name, None).to_string(),
            "/plugin/TestPlugin/file"
        );
    }
}
