//! Fragment grammar tests
//!
//! These tests feed whole fragments through [`crate::parse`] and check both
//! the parsed state and the canonical fragment it renders.

use sheet_history_core::{
    Anchor, AnchoredSelection, CellAction, ColumnOrRowAction, HistoryToken, LabelState,
    MetadataState, OffsetAndCount, PluginState, Selection, SpreadsheetListState,
    SpreadsheetState, TokenKind,
    name::{PluginName, SpreadsheetId},
    value::{CellProperty, MetadataProperty, SaveValue, StyleProperty},
};

use crate::parse;

/// Helper to parse a fragment and return its state inside a spreadsheet
fn spreadsheet_state(fragment: &str) -> SpreadsheetState {
    match parse(fragment).kind() {
        TokenKind::Spreadsheet(_, state) => state.clone(),
        other => panic!("Expected a spreadsheet token for `{fragment}`, got {other:?}"),
    }
}

/// Helper to assert that a fragment parses and renders back unchanged
fn assert_round_trip(fragment: &str) {
    let token = parse(fragment);
    assert_eq!(
        token.url_fragment(),
        fragment,
        "Fragment did not render back unchanged: {token:?}"
    );
    assert_eq!(parse(token.url_fragment()), token);
}

/// Helper to assert that a fragment degrades to another canonical fragment
fn assert_degrades_to(fragment: &str, expected: &str) {
    let token = parse(fragment);
    assert_eq!(
        token.url_fragment(),
        expected,
        "Unexpected fallback for `{fragment}`: {token:?}"
    );
    assert_eq!(token, parse(expected));
}

fn cell(text: &str) -> AnchoredSelection {
    AnchoredSelection::from(Selection::parse_cell(text).unwrap())
}

#[test]
fn test_formula_save() {
    let fragment = "/123/SpreadsheetName456/cell/A1/formula/save/=12%2B3";
    assert_eq!(
        spreadsheet_state(fragment),
        SpreadsheetState::Cell(
            cell("A1"),
            CellAction::PropertySave(
                CellProperty::Formula,
                Some(SaveValue::Text("=12+3".to_string()))
            )
        )
    );
    assert_round_trip(fragment);
}

#[test]
fn test_plugin_list_pagination() {
    let token = parse("/plugin/*/offset/10/count/20");
    assert_eq!(
        token.kind(),
        &TokenKind::Plugin(PluginState::ListSelect(OffsetAndCount::new(
            Some(10),
            Some(20)
        )))
    );
    assert_eq!(token.url_fragment(), "/plugin/*/offset/10/count/20");
}

#[test]
fn test_invalid_sort_falls_back_to_cell() {
    assert_eq!(
        parse("/123/Name/cell/A1/sort/save/!invalid"),
        parse("/123/Name/cell/A1")
    );
}

#[test]
fn test_freeze_outside_sheet_edge_falls_back() {
    assert_degrades_to(
        "/123/Name/column/B:C/right/freeze",
        "/123/Name/column/B:C/right",
    );
    assert_round_trip("/123/Name/column/A:B/right/freeze");
    assert_round_trip("/123/Name/cell/A1/freeze");
}

#[test]
fn test_leading_hash_is_ignored() {
    assert_eq!(parse("#/123/Name"), parse("/123/Name"));
    assert_eq!(parse("#/123/Name").url_fragment(), "/123/Name");
}

#[test]
fn test_empty_fragment_is_spreadsheet_list() {
    let expected = HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY);
    assert_eq!(parse(""), expected);
    assert_eq!(parse("/"), expected);
    assert_eq!(parse("#"), expected);
    assert_eq!(expected.url_fragment(), "/*");
}

#[test]
fn test_unknown_fragment() {
    let token = parse("/hello/world");
    assert_eq!(token.kind(), &TokenKind::Unknown("/hello/world".to_string()));
    assert_eq!(token.url_fragment(), "/hello/world");
}

#[test]
fn test_spreadsheet_load() {
    let expected = HistoryToken::spreadsheet_load(SpreadsheetId::new(123));
    assert_eq!(parse("/123"), expected);
    assert_eq!(parse("/123/"), expected);
    assert_eq!(parse("/123/%20"), expected);
}

#[test]
fn test_spreadsheet_list_fragments() {
    assert_round_trip("/*/offset/5/count/10");
    assert_round_trip("/*/reload");
    assert_round_trip("/rename/7");
    assert_round_trip("/rename/7/save/New%20name");
    assert_round_trip("/delete/7");
    assert_degrades_to("/offset/0", "/*");
    assert_degrades_to("/rename/seven", "/*");
    assert_degrades_to("/metadata", "/*");
    assert_degrades_to("/create-label", "/*");
}

#[test]
fn test_spreadsheet_level_fragments() {
    for fragment in [
        "/123/Name",
        "/123/Name/reload",
        "/123/Name/rename",
        "/123/Name/rename/save/Q1%20%2F%20Q2",
        "/123/Name/delete",
        "/123/Name/create-label",
        "/123/Name/navigate/B3",
        "/123/Name/navigate/B3/right%20100px",
    ] {
        assert_round_trip(fragment);
    }
    assert_degrades_to("/123/Name/navigate/B3/sideways", "/123/Name/navigate/B3");
    assert_degrades_to("/123/Name/bogus", "/123/Name");
}

#[test]
fn test_cell_actions() {
    for fragment in [
        "/123/Name/cell/A1/clear",
        "/123/Name/cell/A1/delete",
        "/123/Name/cell/A1/menu",
        "/123/Name/cell/A1/toolbar",
        "/123/Name/cell/B2:C3/top-left/clear",
        "/123/Name/cell/*/bottom-right/menu",
        "/123/Name/cell/Label1/menu",
        "/123/Name/cell/A1/labels/count/5",
        "/123/Name/cell/A1/references/offset/2",
        "/123/Name/cell/A1/copy/formula",
        "/123/Name/cell/A1/paste/value-type",
        "/123/Name/cell/A1/sort/edit",
        "/123/Name/cell/A1/sort/edit/A=text",
        "/123/Name/cell/A1/sort/save/A=text;B=number%20DOWN",
    ] {
        assert_round_trip(fragment);
    }
}

#[test]
fn test_cell_property_fragments() {
    for fragment in [
        "/123/Name/cell/A1/formula",
        "/123/Name/cell/A1/formula/save/",
        "/123/Name/cell/A1/locale/save/en-AU",
        "/123/Name/cell/A1/currency/save/AUD",
        "/123/Name/cell/A1/valueType/save/date-time",
        "/123/Name/cell/A1/style/color/save/",
        "/123/Name/cell/A1/pattern/date-format",
    ] {
        assert_round_trip(fragment);
    }
    assert_eq!(
        spreadsheet_state("/123/Name/cell/A1/style/color/save/"),
        SpreadsheetState::Cell(
            cell("A1"),
            CellAction::PropertySave(CellProperty::Style(StyleProperty::Color), None)
        )
    );
}

#[test]
fn test_cell_fallbacks() {
    assert_degrades_to("/123/Name/cell/A1/locale/save/english", "/123/Name/cell/A1/locale");
    assert_degrades_to("/123/Name/cell/A1/copy/nothing", "/123/Name/cell/A1");
    assert_degrades_to("/123/Name/cell/A1/bogus", "/123/Name/cell/A1");
    assert_degrades_to("/123/Name/cell/A1/top-left/clear", "/123/Name/cell/A1/clear");
    assert_degrades_to("/123/Name/cell/!!/clear", "/123/Name");
    assert_degrades_to(
        "/123/Name/cell/B2:C3/left/clear",
        "/123/Name/cell/B2:C3/bottom-right",
    );
}

#[test]
fn test_column_and_row_actions() {
    for fragment in [
        "/123/Name/column/B",
        "/123/Name/column/B:D/left/hide",
        "/123/Name/column/C/unhide",
        "/123/Name/column/A:C/right/sort/save/1=text",
        "/123/Name/row/3/insertAfter/2",
        "/123/Name/row/3:4/top/insertBefore/1",
        "/123/Name/row/1/unfreeze",
        "/123/Name/row/2/sort/save/B=number",
    ] {
        assert_round_trip(fragment);
    }
    assert_degrades_to("/123/Name/row/3/insertAfter/0", "/123/Name/row/3");
    assert_degrades_to("/123/Name/column/C/toolbar", "/123/Name/column/C");
    assert_degrades_to(
        "/123/Name/column/A:C/right/sort/save/A=text",
        "/123/Name/column/A:C/right",
    );
    assert_eq!(
        spreadsheet_state("/123/Name/row/3/insertAfter/2"),
        SpreadsheetState::Row(
            AnchoredSelection::from(Selection::parse_row("3").unwrap()),
            ColumnOrRowAction::InsertAfter(2)
        )
    );
}

#[test]
fn test_label_fragments() {
    for fragment in [
        "/123/Name/label",
        "/123/Name/label/*",
        "/123/Name/label/*/offset/1/count/2",
        "/123/Name/label/Label1",
        "/123/Name/label/Label1/save/B2:C3",
        "/123/Name/label/Label1/save/Label2",
        "/123/Name/label/Label1/delete",
        "/123/Name/label/Label1/references/count/3",
    ] {
        assert_round_trip(fragment);
    }
    assert_degrades_to("/123/Name/label/Label1/save/Label1", "/123/Name/label/Label1");
    assert_degrades_to("/123/Name/label/A1", "/123/Name/label");
}

#[test]
fn test_metadata_fragments() {
    for fragment in [
        "/123/Name/metadata",
        "/123/Name/metadata/roundingMode/save/HALF_UP",
        "/123/Name/metadata/twoDigitYear/save/50",
        "/123/Name/metadata/valueSeparator/save/;",
        "/123/Name/metadata/style/font-weight",
    ] {
        assert_round_trip(fragment);
    }
    assert_eq!(
        spreadsheet_state("/123/Name/metadata/locale/save/en-AU"),
        SpreadsheetState::Metadata(MetadataState::PropertySave(
            MetadataProperty::Locale,
            Some(SaveValue::Locale("en-AU".parse().unwrap()))
        ))
    );
    assert_degrades_to(
        "/123/Name/metadata/twoDigitYear/save/100",
        "/123/Name/metadata/twoDigitYear",
    );
    assert_degrades_to("/123/Name/metadata/style/sparkle", "/123/Name/metadata");
}

#[test]
fn test_form_fragments() {
    assert_round_trip("/123/Name/form/*");
    assert_round_trip("/123/Name/form/*/count/10");
    assert_round_trip("/123/Name/form/Contact");
    assert_round_trip("/123/Name/form/Contact/delete");
    assert_degrades_to("/123/Name/form", "/123/Name/form/*");

    let form = r#"{"name":"Contact","fields":[{"reference":"A1","label":"Email","value_type":"text"}]}"#;
    let token = parse(&format!("/123/Name/form/Contact/save/{form}"));
    assert!(
        token.url_fragment().starts_with("/123/Name/form/Contact/save/%7B"),
        "Unexpected form fragment {}",
        token.url_fragment()
    );
    assert_eq!(parse(token.url_fragment()), token);

    let other = form.replace("\"Contact\"", "\"Other\"");
    assert_degrades_to(
        &format!("/123/Name/form/Contact/save/{other}"),
        "/123/Name/form/Contact",
    );
}

#[test]
fn test_plugin_fragments() {
    for fragment in [
        "/plugin/*",
        "/plugin/*/reload",
        "/plugin/*/offset/1/reload",
        "/plugin/TestPlugin",
        "/plugin/TestPlugin/save/hello%20world",
        "/plugin/TestPlugin/delete",
        "/plugin/TestPlugin/file",
        "/plugin/TestPlugin/file/dir/read%20me.txt",
        "/plugin-upload",
        "/plugin-upload/save/notes.txt%2FaGVsbG8_d29ybGQ=",
    ] {
        assert_round_trip(fragment);
    }
    assert_eq!(
        parse("/plugin/TestPlugin/file/dir/read%20me.txt").kind(),
        &TokenKind::Plugin(PluginState::FileView(
            PluginName::new("TestPlugin").unwrap(),
            Some("dir/read me.txt".to_string())
        ))
    );
    assert_degrades_to("/plugin", "/plugin/*");
    assert_degrades_to("/plugin/TestPlugin/save/", "/plugin/TestPlugin");
    assert_degrades_to("/plugin/offset/many", "/plugin/*");
    assert_degrades_to("/plugin-upload/save/no-content", "/plugin-upload");
}

#[test]
fn test_keyword_wins_over_plugin_name() {
    assert_eq!(
        parse("/plugin/reload").kind(),
        &TokenKind::Plugin(PluginState::ListReload(OffsetAndCount::EMPTY))
    );
    assert_eq!(
        parse("/plugin/count/3").kind(),
        &TokenKind::Plugin(PluginState::ListSelect(OffsetAndCount::new(None, Some(3))))
    );
}

#[test]
fn test_list_states() {
    assert_eq!(
        parse("/rename/7").kind(),
        &TokenKind::SpreadsheetList(SpreadsheetListState::RenameSelect(SpreadsheetId::new(7)))
    );
    assert_eq!(
        spreadsheet_state("/123/Name/label/*"),
        SpreadsheetState::Label(LabelState::List(OffsetAndCount::EMPTY))
    );
}

#[test]
fn test_anchor_is_normalized_for_single_cell() {
    let state = spreadsheet_state("/123/Name/cell/C3/top-left");
    let SpreadsheetState::Cell(selection, CellAction::Select) = state else {
        panic!("Expected a cell select state, got {state:?}");
    };
    assert_eq!(selection.anchor(), Anchor::None);
}

mod proptest_tests {
    use proptest::prelude::*;
    use sheet_history_core::{
        SpreadsheetContext,
        name::{FormName, SpreadsheetName},
        reference::{CellRange, CellRef, ColumnRange, ColumnRef, LabelName, RowRange, RowRef},
        value::{
            BrowserFile, ClipboardOperation, ClipboardValueKind, Form, FormField, Navigation,
            NavigationAmount, NavigationDirection, StyleValue, ValueKind, ValueType,
        },
    };

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn cell_ref_strategy() -> impl Strategy<Value = CellRef> {
        (0u32..60, 0u32..200).prop_map(|(column, row)| {
            CellRef::new(ColumnRef::new(column).unwrap(), RowRef::new(row).unwrap())
        })
    }

    fn cell_selection_strategy() -> impl Strategy<Value = Selection> {
        (cell_ref_strategy(), cell_ref_strategy())
            .prop_map(|(a, b)| Selection::from(CellRange::new(a, b)))
    }

    fn column_or_row_selection_strategy() -> impl Strategy<Value = Selection> {
        let columns = (0u32..60, 0u32..60).prop_map(|(a, b)| {
            Selection::from(ColumnRange::new(
                ColumnRef::new(a).unwrap(),
                ColumnRef::new(b).unwrap(),
            ))
        });
        let rows = (0u32..200, 0u32..200).prop_map(|(a, b)| {
            Selection::from(RowRange::new(RowRef::new(a).unwrap(), RowRef::new(b).unwrap()))
        });
        prop_oneof![columns, rows]
    }

    /// Attaches one of the anchors, keeping the default one when the
    /// selection cannot carry it.
    fn anchored(
        selection: impl Strategy<Value = Selection>,
    ) -> impl Strategy<Value = AnchoredSelection> {
        let anchors = prop::sample::select(vec![
            Anchor::None,
            Anchor::TopLeft,
            Anchor::TopRight,
            Anchor::BottomLeft,
            Anchor::BottomRight,
            Anchor::Left,
            Anchor::Right,
            Anchor::Top,
            Anchor::Bottom,
        ]);
        (selection, anchors).prop_map(|(selection, anchor)| {
            AnchoredSelection::new(selection.clone(), anchor)
                .unwrap_or_else(|_| AnchoredSelection::from(selection))
        })
    }

    /// Cell, column and row selections with every anchor they may carry.
    fn anchored_selection_strategy() -> impl Strategy<Value = AnchoredSelection> {
        anchored(prop_oneof![
            cell_selection_strategy(),
            column_or_row_selection_strategy()
        ])
    }

    /// Text starting with a letter, with characters that need
    /// percent-encoding and some outside ASCII.
    fn name_text_strategy() -> impl Strategy<Value = String> {
        "[A-Za-zé日][A-Za-z0-9 /+%#?;=:é€日]{0,12}"
    }

    fn spreadsheet_name_strategy() -> impl Strategy<Value = SpreadsheetName> {
        name_text_strategy().prop_map(|name| SpreadsheetName::new(name).unwrap())
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        "[=A-Za-z0-9 /+%#?*;:.\"é€日]{1,16}"
    }

    /// One component of a plugin file path.
    fn path_component_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 +%#?.é日-]{1,8}"
    }

    fn label_name_strategy() -> impl Strategy<Value = LabelName> {
        "[A-Za-z_][A-Za-z0-9_.]{0,10}"
            .prop_filter_map("label names must not read as cells", |name| {
                LabelName::new(name).ok()
            })
    }

    fn plugin_name_strategy() -> impl Strategy<Value = PluginName> {
        "[A-Za-z][A-Za-z0-9-]{0,10}"
            .prop_filter_map("plugin names must not be list keywords", |name| {
                PluginName::new(name).ok()
            })
    }

    fn form_name_strategy() -> impl Strategy<Value = FormName> {
        "[A-Za-z][A-Za-z0-9-]{0,10}".prop_map(|name| FormName::new(name).unwrap())
    }

    fn context_strategy() -> impl Strategy<Value = SpreadsheetContext> {
        (any::<u64>(), spreadsheet_name_strategy())
            .prop_map(|(id, name)| SpreadsheetContext::new(SpreadsheetId::new(id), name))
    }

    fn offset_and_count_strategy() -> impl Strategy<Value = OffsetAndCount> {
        (prop::option::of(0u32..1000), prop::option::of(0u32..1000))
            .prop_map(|(offset, count)| OffsetAndCount::new(offset, count))
    }

    fn navigation_strategy() -> impl Strategy<Value = Navigation> {
        let directions = prop::sample::select(vec![
            NavigationDirection::Left,
            NavigationDirection::Right,
            NavigationDirection::Up,
            NavigationDirection::Down,
        ]);
        (directions, prop::option::of(0u32..500)).prop_map(|(direction, pixels)| {
            let amount = pixels.map_or(NavigationAmount::Step, NavigationAmount::Pixels);
            Navigation::new(direction, amount)
        })
    }

    fn form_field_strategy() -> impl Strategy<Value = FormField> {
        let value_types = prop::sample::select(vec![
            ValueType::Boolean,
            ValueType::Date,
            ValueType::DateTime,
            ValueType::Number,
            ValueType::Text,
            ValueType::Time,
        ]);
        (cell_ref_strategy(), text_strategy(), prop::option::of(value_types)).prop_map(
            |(reference, label, value_type)| FormField::new(reference, label, value_type),
        )
    }

    fn spreadsheet_select(context: &SpreadsheetContext) -> HistoryToken {
        HistoryToken::spreadsheet_select(context.id(), context.name().clone())
    }

    /// A selection with an action, or one of the list states.
    fn selected_token_strategy() -> impl Strategy<Value = HistoryToken> {
        let selected = (
            context_strategy(),
            anchored_selection_strategy(),
            0usize..5,
            text_strategy(),
        )
            .prop_map(|(context, selection, action, text)| {
                let token = HistoryToken::selection_select(context, selection);
                match action {
                    0 => token,
                    1 => token.menu(None),
                    2 => token.clear(),
                    3 => token.set_sort_edit(&text),
                    _ => token.delete(),
                }
            });
        let cells = (
            context_strategy(),
            anchored(cell_selection_strategy()),
            0usize..5,
            text_strategy(),
            name_text_strategy(),
            offset_and_count_strategy(),
            prop::sample::select(ClipboardOperation::ALL.to_vec()),
            prop::sample::select(ClipboardValueKind::ALL.to_vec()),
        )
            .prop_map(
                |(context, selection, action, text, font, oc, operation, clipboard)| {
                    let token = HistoryToken::selection_select(context, selection);
                    match action {
                        0 => token.set_clipboard(operation, clipboard),
                        1 => token
                            .set_cell_property(CellProperty::Formula)
                            .set_save_string_value(&text)
                            .unwrap(),
                        2 => token
                            .set_cell_property(CellProperty::Style(StyleProperty::FontFamily))
                            .set_save_value(Some(SaveValue::Style(StyleValue::Text(font))))
                            .unwrap(),
                        3 => token.set_labels(oc),
                        _ => token.set_references(oc),
                    }
                },
            );
        let columns_or_rows = (
            context_strategy(),
            anchored(column_or_row_selection_strategy()),
            1u32..1000,
            any::<bool>(),
        )
            .prop_map(|(context, selection, count, after)| {
                let token = HistoryToken::selection_select(context, selection);
                if after {
                    token.insert_after(count).unwrap()
                } else {
                    token.insert_before(count).unwrap()
                }
            });
        let navigations = (
            context_strategy(),
            cell_ref_strategy(),
            prop::collection::vec(navigation_strategy(), 0..4),
        )
            .prop_map(|(context, home, navigations)| {
                spreadsheet_select(&context).navigation(home, navigations)
            });
        let renames = (context_strategy(), spreadsheet_name_strategy(), any::<bool>()).prop_map(
            |(context, name, from_list)| {
                let token = if from_list {
                    HistoryToken::spreadsheet_load(context.id()).rename()
                } else {
                    spreadsheet_select(&context).rename()
                };
                token
                    .set_save_value(Some(SaveValue::SpreadsheetName(name)))
                    .unwrap()
            },
        );
        let lists = (offset_and_count_strategy(), any::<bool>()).prop_map(|(oc, plugin)| {
            if plugin {
                HistoryToken::plugin_list_select(oc)
            } else {
                HistoryToken::spreadsheet_list_select(oc).reload()
            }
        });
        prop_oneof![selected, cells, columns_or_rows, navigations, renames, lists]
    }

    /// Metadata, label, form and plugin states with saved values.
    fn saved_token_strategy() -> impl Strategy<Value = HistoryToken> {
        let metadata = (
            context_strategy(),
            prop::sample::select(MetadataProperty::ALL.to_vec()),
            prop::sample::select(vec![';', ',', '/', '%', ' ', 'é']),
            0u32..100,
        )
            .prop_map(|(context, property, separator, number)| {
                let value = match property.value_kind() {
                    ValueKind::Character => Some(SaveValue::Character(separator)),
                    ValueKind::Number { .. } => Some(SaveValue::Number(number)),
                    _ => None,
                };
                spreadsheet_select(&context)
                    .set_metadata_property_name(property)
                    .set_save_value(value)
                    .unwrap()
            });
        let styles = (
            context_strategy(),
            prop::sample::select(StyleProperty::ALL.to_vec()),
            name_text_strategy(),
            1u32..200,
        )
            .prop_map(|(context, property, text, number)| {
                let value = match property {
                    StyleProperty::FontFamily => Some(StyleValue::Text(text)),
                    StyleProperty::FontSize => Some(StyleValue::Number(number)),
                    StyleProperty::Width | StyleProperty::Height => {
                        Some(StyleValue::Length(number))
                    }
                    _ => property.keywords().first().copied().map(StyleValue::Keyword),
                };
                spreadsheet_select(&context)
                    .set_metadata_style_property(property)
                    .set_save_value(value.map(SaveValue::Style))
                    .unwrap()
            });
        let labels = (
            context_strategy(),
            label_name_strategy(),
            prop_oneof![
                cell_selection_strategy(),
                label_name_strategy().prop_map(Selection::Label)
            ],
            prop::option::of(offset_and_count_strategy()),
        )
            .prop_filter_map(
                "a label cannot point at itself",
                |(context, label, target, references)| {
                    let token = spreadsheet_select(&context).set_label_name(Some(label));
                    match references {
                        Some(oc) => Some(token.set_references(oc)),
                        None => token.set_save_value(Some(SaveValue::Selection(target))).ok(),
                    }
                },
            );
        let forms = (
            context_strategy(),
            form_name_strategy(),
            prop::collection::vec(form_field_strategy(), 0..3),
        )
            .prop_map(|(context, name, fields)| {
                let form = Form::new(name.clone(), fields);
                spreadsheet_select(&context)
                    .set_form_name(name)
                    .set_save_value(Some(SaveValue::Form(form)))
                    .unwrap()
            });
        let plugins = (
            plugin_name_strategy(),
            text_strategy(),
            prop::collection::vec(path_component_strategy(), 0..3),
            any::<bool>(),
        )
            .prop_map(|(name, text, components, save)| {
                if save {
                    HistoryToken::new(TokenKind::Plugin(PluginState::Select(name)))
                        .unwrap()
                        .set_save_string_value(&text)
                        .unwrap()
                } else {
                    let path = (!components.is_empty()).then(|| components.join("/"));
                    HistoryToken::new(TokenKind::Plugin(PluginState::FileView(name, path)))
                        .unwrap()
                }
            });
        let uploads = (name_text_strategy(), prop::collection::vec(any::<u8>(), 0..32)).prop_map(
            |(name, content)| {
                let file = BrowserFile::new(name, content).unwrap();
                HistoryToken::new(TokenKind::Plugin(PluginState::UploadSelect))
                    .unwrap()
                    .set_save_value(Some(SaveValue::File(file)))
                    .unwrap()
            },
        );
        prop_oneof![metadata, styles, labels, forms, plugins, uploads]
    }

    /// Tokens reachable by a user.
    fn token_strategy() -> impl Strategy<Value = HistoryToken> {
        prop_oneof![selected_token_strategy(), saved_token_strategy()]
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every reachable token parses back from its own fragment.
    fn check_round_trip(token: &HistoryToken) -> Result<(), TestCaseError> {
        let parsed = parse(token.url_fragment());
        prop_assert_eq!(&parsed, token, "fragment `{}`", token.url_fragment());
        Ok(())
    }

    /// The fragment is rendered once and shared by clones.
    fn check_fragment_memoized(token: &HistoryToken) -> Result<(), TestCaseError> {
        let first = token.url_fragment();
        let clone = token.clone();
        prop_assert!(std::ptr::eq(first, token.url_fragment()));
        prop_assert!(std::ptr::eq(first, clone.url_fragment()));
        Ok(())
    }

    /// A fragment that is already canonical renders unchanged.
    fn check_canonical_fragment_is_stable(token: &HistoryToken) -> Result<(), TestCaseError> {
        let parsed = parse(token.url_fragment());
        prop_assert_eq!(parsed.url_fragment(), token.url_fragment());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn round_trip(token in token_strategy()) {
            check_round_trip(&token)?;
        }

        #[test]
        fn fragment_memoized(token in token_strategy()) {
            check_fragment_memoized(&token)?;
        }

        #[test]
        fn canonical_fragment_is_stable(token in token_strategy()) {
            check_canonical_fragment_is_stable(&token)?;
        }

        #[test]
        fn parse_never_panics(fragment in "[a-z0-9*/%:=-]{0,40}") {
            let token = parse(&fragment);
            let reparsed = parse(token.url_fragment());
            prop_assert_eq!(reparsed.url_fragment(), token.url_fragment());
        }
    }
}
