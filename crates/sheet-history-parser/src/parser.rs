//! Parser for history token URL fragments.
//!
//! A fragment is split on `/` into percent-decoded segments which are
//! consumed left to right. Literal keywords always take priority over typed
//! values at the same position.
//!
//! Parsing is total. When a segment cannot be read as the value expected at
//! its position, the rest of the fragment is dropped and the state reached so
//! far is kept. The public entry point is [`parse_fragment`].

use std::str::FromStr;

use log::{debug, trace};
use winnow::{
    Parser,
    combinator::{alt, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use sheet_history_core::{
    CellAction, ColumnOrRowAction, FormState, HistoryToken, LabelState, MetadataState,
    OffsetAndCount, PluginState, SpreadsheetContext, SpreadsheetListState, SpreadsheetState,
    TokenKind,
    encoding::decode_segment,
    error::ValueError,
    name::{FormName, PluginName, SpreadsheetId, SpreadsheetName},
    reference::{CellRef, LabelName},
    selection::{Anchor, AnchoredSelection, Selection},
    value::{
        BrowserFile, CellProperty, ClipboardOperation, ClipboardValueKind, Form,
        MetadataProperty, Navigation, SortComparators, StyleProperty,
    },
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// A literal segment that was expected
    Keyword(&'static str),
    /// Description of the typed value being parsed
    Label(&'static str),
}

type Input<'a> = TokenSlice<'a, String>;
type Error = ErrMode<ContextError<Context>>;
type IResult<O> = std::result::Result<O, Error>;

/// Splits `fragment` on `/` and decodes every segment. Empty leading and
/// trailing segments are dropped.
fn split_segments(fragment: &str) -> Vec<String> {
    let raw: Vec<&str> = fragment.split('/').collect();
    let start = raw
        .iter()
        .position(|segment| !segment.is_empty())
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|segment| !segment.is_empty())
        .map_or(start, |last| last + 1);
    raw[start..end]
        .iter()
        .map(|segment| decode_segment(segment).into_owned())
        .collect()
}

/// Parse the literal segment `expected`
fn keyword<'a>(expected: &'static str) -> impl Parser<Input<'a>, (), Error> {
    any.verify(move |segment: &String| segment == expected)
        .void()
        .context(Context::Keyword(expected))
}

/// Parse a segment with `parse`
fn segment_value<'a, T>(
    label: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> impl Parser<Input<'a>, T, Error> {
    any.verify_map(move |segment: &String| parse(segment))
        .context(Context::Label(label))
}

/// Parse a segment through its [`FromStr`] implementation
fn typed<'a, T: FromStr>(label: &'static str) -> impl Parser<Input<'a>, T, Error> {
    segment_value(label, |segment| segment.parse().ok())
}

fn number<'a>() -> impl Parser<Input<'a>, u32, Error> {
    typed("number")
}

/// Parse any segment as free text
fn text<'a>() -> impl Parser<Input<'a>, String, Error> {
    segment_value("text", |segment| Some(segment.to_string()))
}

/// Consumes `expected` if it is the next segment.
fn matches_keyword(input: &mut Input<'_>, expected: &'static str) -> bool {
    keyword(expected).parse_next(input).is_ok()
}

/// Runs `parser`. On failure the fragment remainder is abandoned and `None`
/// returned, so the caller keeps the state it has reached.
fn step<'a, O>(input: &mut Input<'a>, mut parser: impl Parser<Input<'a>, O, Error>) -> Option<O> {
    match parser.parse_next(input) {
        Ok(output) => Some(output),
        Err(ErrMode::Backtrack(e) | ErrMode::Cut(e)) => {
            let remaining = input.eof_offset();
            if remaining > 0 {
                let expected: Vec<&Context> = e.context().collect();
                debug!(expected:?, remaining; "Abandoning fragment remainder");
            }
            None
        }
        Err(_) => None,
    }
}

/// Keeps `state` when it is valid, otherwise falls back to its parent.
fn checked(
    state: SpreadsheetState,
    fallback: impl FnOnce() -> SpreadsheetState,
) -> SpreadsheetState {
    match state.validate() {
        Ok(()) => state,
        Err(err) => {
            debug!(error = err.to_string(); "Dropping invalid state");
            fallback()
        }
    }
}

/// Parse optional `offset/<n>` and `count/<n>` segments
fn offset_and_count(input: &mut Input<'_>) -> OffsetAndCount {
    let offset = opt(preceded(keyword("offset"), number()))
        .parse_next(input)
        .ok()
        .flatten();
    let count = opt(preceded(keyword("count"), number()))
        .parse_next(input)
        .ok()
        .flatten();
    OffsetAndCount::new(offset, count)
}

/// Parse `save` followed by an optional value.
///
/// Returns `None` when there is no `save` segment or its value does not
/// parse, and `Some(None)` when the value is absent.
fn save<T>(
    input: &mut Input<'_>,
    parse: impl Fn(&str) -> Result<T, ValueError>,
) -> Option<Option<T>> {
    step(input, keyword("save"))?;
    if input.eof_offset() == 0 {
        return Some(None);
    }
    step(input, segment_value("save value", |text| parse(text).ok())).map(Some)
}

/// Parse a selection and its optional anchor.
///
/// An anchor the selection cannot carry is left unconsumed.
fn anchored_selection(
    input: &mut Input<'_>,
    parse: fn(&str) -> Result<Selection, ValueError>,
) -> IResult<AnchoredSelection> {
    let selection = segment_value("selection", |text| parse(text).ok()).parse_next(input)?;
    let anchored = opt(segment_value("anchor", |text| {
        let anchor = text.parse::<Anchor>().ok()?;
        AnchoredSelection::new(selection.clone(), anchor).ok()
    }))
    .parse_next(input)?;
    Ok(anchored.unwrap_or_else(|| AnchoredSelection::from(selection)))
}

enum Sort {
    Edit(String),
    Save(SortComparators),
}

/// Parse the segments after `sort`
fn sort(input: &mut Input<'_>) -> Option<Sort> {
    step(
        input,
        alt((
            preceded(keyword("edit"), opt(text())).map(|text| Sort::Edit(text.unwrap_or_default())),
            preceded(keyword("save"), typed("sort comparators")).map(Sort::Save),
        )),
    )
}

fn cell_property(input: &mut Input<'_>) -> IResult<CellProperty> {
    alt((
        preceded(keyword("style"), typed("style property")).map(CellProperty::Style),
        preceded(keyword("pattern"), typed("pattern kind")).map(CellProperty::Pattern),
        segment_value("cell property", CellProperty::from_keyword),
    ))
    .parse_next(input)
}

fn cell_action(input: &mut Input<'_>) -> CellAction {
    let checkpoint = input.checkpoint();
    let Some(segment) = input.next_token() else {
        return CellAction::Select;
    };
    match segment.as_str() {
        "clear" => CellAction::Clear,
        "delete" => CellAction::Delete,
        "freeze" => CellAction::Freeze,
        "unfreeze" => CellAction::Unfreeze,
        "menu" => CellAction::Menu,
        "toolbar" => CellAction::Toolbar,
        "labels" => CellAction::Labels(offset_and_count(input)),
        "references" => CellAction::References(offset_and_count(input)),
        "sort" => match sort(input) {
            Some(Sort::Edit(text)) => CellAction::SortEdit(text),
            Some(Sort::Save(comparators)) => CellAction::SortSave(comparators),
            None => CellAction::Select,
        },
        other => {
            if let Ok(operation) = other.parse::<ClipboardOperation>() {
                return step(input, typed::<ClipboardValueKind>("clipboard value"))
                    .map_or(CellAction::Select, |kind| {
                        CellAction::Clipboard(operation, kind)
                    });
            }
            input.reset(&checkpoint);
            let Some(property) = step(input, cell_property) else {
                return CellAction::Select;
            };
            match save(input, |text| property.value_kind().parse(text)) {
                Some(value) => CellAction::PropertySave(property, value),
                None => CellAction::PropertySelect(property),
            }
        }
    }
}

fn cell(input: &mut Input<'_>) -> SpreadsheetState {
    let Some(selection) = step(input, |input: &mut Input<'_>| {
        anchored_selection(input, Selection::parse_cell)
    }) else {
        return SpreadsheetState::Select;
    };
    let action = cell_action(input);
    checked(SpreadsheetState::Cell(selection.clone(), action), || {
        SpreadsheetState::Cell(selection, CellAction::Select)
    })
}

fn column_or_row_action(input: &mut Input<'_>) -> ColumnOrRowAction {
    let checkpoint = input.checkpoint();
    let Some(segment) = input.next_token() else {
        return ColumnOrRowAction::Select;
    };
    match segment.as_str() {
        "clear" => ColumnOrRowAction::Clear,
        "delete" => ColumnOrRowAction::Delete,
        "freeze" => ColumnOrRowAction::Freeze,
        "unfreeze" => ColumnOrRowAction::Unfreeze,
        "menu" => ColumnOrRowAction::Menu,
        "hide" => ColumnOrRowAction::Hide,
        "unhide" => ColumnOrRowAction::Unhide,
        "insertAfter" => {
            step(input, number()).map_or(ColumnOrRowAction::Select, ColumnOrRowAction::InsertAfter)
        }
        "insertBefore" => step(input, number())
            .map_or(ColumnOrRowAction::Select, ColumnOrRowAction::InsertBefore),
        "sort" => match sort(input) {
            Some(Sort::Edit(text)) => ColumnOrRowAction::SortEdit(text),
            Some(Sort::Save(comparators)) => ColumnOrRowAction::SortSave(comparators),
            None => ColumnOrRowAction::Select,
        },
        _ => {
            input.reset(&checkpoint);
            ColumnOrRowAction::Select
        }
    }
}

/// Parse the segments after `column` or `row`.
fn column_or_row(
    input: &mut Input<'_>,
    parse: fn(&str) -> Result<Selection, ValueError>,
    state: fn(AnchoredSelection, ColumnOrRowAction) -> SpreadsheetState,
) -> SpreadsheetState {
    let Some(selection) = step(input, |input: &mut Input<'_>| {
        anchored_selection(input, parse)
    }) else {
        return SpreadsheetState::Select;
    };
    let action = column_or_row_action(input);
    checked(state(selection.clone(), action), || {
        state(selection, ColumnOrRowAction::Select)
    })
}

fn label(input: &mut Input<'_>) -> SpreadsheetState {
    if matches_keyword(input, "*") {
        return SpreadsheetState::Label(LabelState::List(offset_and_count(input)));
    }
    let Some(name) = step(input, typed::<LabelName>("label name")) else {
        return SpreadsheetState::Label(LabelState::Select(None));
    };
    let state = if matches_keyword(input, "delete") {
        LabelState::Delete(name.clone())
    } else if matches_keyword(input, "references") {
        LabelState::References(name.clone(), offset_and_count(input))
    } else {
        match save(input, Selection::parse_cell) {
            Some(Some(target)) => LabelState::Save(name.clone(), target),
            _ => LabelState::Select(Some(name.clone())),
        }
    };
    checked(SpreadsheetState::Label(state), || {
        SpreadsheetState::Label(LabelState::Select(Some(name)))
    })
}

fn metadata(input: &mut Input<'_>) -> MetadataState {
    if matches_keyword(input, "style") {
        let Some(property) = step(input, typed::<StyleProperty>("style property")) else {
            return MetadataState::Select;
        };
        return match save(input, |text| property.parse_value(text)) {
            Some(value) => MetadataState::StyleSave(property, value),
            None => MetadataState::StyleSelect(property),
        };
    }
    let Some(property) = step(input, typed::<MetadataProperty>("metadata property")) else {
        return MetadataState::Select;
    };
    match save(input, |text| property.value_kind().parse(text)) {
        Some(value) => MetadataState::PropertySave(property, value),
        None => MetadataState::PropertySelect(property),
    }
}

fn form(input: &mut Input<'_>) -> SpreadsheetState {
    if matches_keyword(input, "*") {
        return SpreadsheetState::Form(FormState::List(offset_and_count(input)));
    }
    let Some(name) = step(input, typed::<FormName>("form name")) else {
        return SpreadsheetState::Form(FormState::List(OffsetAndCount::EMPTY));
    };
    let state = if matches_keyword(input, "delete") {
        FormState::Delete(name.clone())
    } else {
        match save(input, str::parse::<Form>) {
            Some(Some(form)) => FormState::Save(name.clone(), form),
            _ => FormState::Select(name.clone()),
        }
    };
    checked(SpreadsheetState::Form(state), || {
        SpreadsheetState::Form(FormState::Select(name))
    })
}

fn navigate(input: &mut Input<'_>) -> SpreadsheetState {
    let Some(home) = step(input, typed::<CellRef>("home cell")) else {
        return SpreadsheetState::Select;
    };
    let navigations = step(
        input,
        segment_value("navigations", |text| Navigation::parse_list(text).ok()),
    )
    .unwrap_or_default();
    SpreadsheetState::Navigate(home, navigations)
}

fn spreadsheet_state(input: &mut Input<'_>) -> SpreadsheetState {
    let checkpoint = input.checkpoint();
    let Some(segment) = input.next_token() else {
        return SpreadsheetState::Select;
    };
    match segment.as_str() {
        "reload" => SpreadsheetState::Reload,
        "delete" => SpreadsheetState::Delete,
        "rename" => match save(input, str::parse::<SpreadsheetName>) {
            Some(Some(name)) => SpreadsheetState::RenameSave(name),
            _ => SpreadsheetState::RenameSelect,
        },
        "create-label" => SpreadsheetState::Label(LabelState::Create),
        "navigate" => navigate(input),
        "cell" => cell(input),
        "column" => column_or_row(input, Selection::parse_column, SpreadsheetState::Column),
        "row" => column_or_row(input, Selection::parse_row, SpreadsheetState::Row),
        "label" => label(input),
        "metadata" => SpreadsheetState::Metadata(metadata(input)),
        "form" => form(input),
        _ => {
            input.reset(&checkpoint);
            SpreadsheetState::Select
        }
    }
}

fn spreadsheet(input: &mut Input<'_>, id: SpreadsheetId) -> TokenKind {
    let Some(name) = step(input, typed::<SpreadsheetName>("spreadsheet name")) else {
        return TokenKind::SpreadsheetLoad(id);
    };
    TokenKind::Spreadsheet(SpreadsheetContext::new(id, name), spreadsheet_state(input))
}

fn spreadsheet_list(input: &mut Input<'_>) -> SpreadsheetListState {
    matches_keyword(input, "*");
    let offset_and_count = offset_and_count(input);
    if matches_keyword(input, "reload") {
        return SpreadsheetListState::Reload(offset_and_count);
    }
    if matches_keyword(input, "rename") {
        let Some(id) = step(input, typed::<SpreadsheetId>("spreadsheet id")) else {
            return SpreadsheetListState::Select(offset_and_count);
        };
        return match save(input, str::parse::<SpreadsheetName>) {
            Some(Some(name)) => SpreadsheetListState::RenameSave(id, name),
            _ => SpreadsheetListState::RenameSelect(id),
        };
    }
    if matches_keyword(input, "delete") {
        return step(input, typed::<SpreadsheetId>("spreadsheet id")).map_or(
            SpreadsheetListState::Select(offset_and_count),
            SpreadsheetListState::Delete,
        );
    }
    SpreadsheetListState::Select(offset_and_count)
}

fn file_view(input: &mut Input<'_>, name: PluginName) -> PluginState {
    let components: Vec<String> = repeat(0.., text()).parse_next(input).unwrap_or_default();
    let path = (!components.is_empty()).then(|| components.join("/"));
    let state = PluginState::FileView(name.clone(), path);
    match state.validate() {
        Ok(()) => state,
        Err(err) => {
            debug!(error = err.to_string(); "Dropping invalid plugin file path");
            PluginState::Select(name)
        }
    }
}

fn plugin(input: &mut Input<'_>) -> PluginState {
    let star = matches_keyword(input, "*");
    let offset_and_count = offset_and_count(input);
    if matches_keyword(input, "reload") {
        return PluginState::ListReload(offset_and_count);
    }
    if star || !offset_and_count.is_empty() {
        return PluginState::ListSelect(offset_and_count);
    }
    let Some(name) = step(input, typed::<PluginName>("plugin name")) else {
        return PluginState::ListSelect(offset_and_count);
    };
    if matches_keyword(input, "delete") {
        return PluginState::Delete(name);
    }
    if matches_keyword(input, "file") {
        return file_view(input, name);
    }
    match save(input, |text| Ok(text.to_string())) {
        Some(Some(text)) if !text.is_empty() => PluginState::Save(name, text),
        _ => PluginState::Select(name),
    }
}

fn plugin_upload(input: &mut Input<'_>) -> PluginState {
    match save(input, str::parse::<BrowserFile>) {
        Some(Some(file)) => PluginState::UploadSave(file),
        _ => PluginState::UploadSelect,
    }
}

fn token_kind(input: &mut Input<'_>, fragment: &str) -> TokenKind {
    if let Ok(id) = typed::<SpreadsheetId>("spreadsheet id").parse_next(input) {
        return spreadsheet(input, id);
    }
    if matches_keyword(input, "plugin") {
        return TokenKind::Plugin(plugin(input));
    }
    if matches_keyword(input, "plugin-upload") {
        return TokenKind::Plugin(plugin_upload(input));
    }
    match input.peek_token().map(String::as_str) {
        None
        | Some(
            "*" | "offset" | "count" | "reload" | "rename" | "delete" | "metadata"
            | "create-label",
        ) => TokenKind::SpreadsheetList(spreadsheet_list(input)),
        Some(_) => {
            let _ = input.next_slice(input.eof_offset());
            TokenKind::Unknown(fragment.to_string())
        }
    }
}

/// Parses a URL fragment into a [`HistoryToken`].
///
/// A leading `#` is ignored. The result is never an error: unreadable
/// segments are dropped together with everything after them, and a fragment
/// that names no known state becomes [`TokenKind::Unknown`].
pub fn parse_fragment(fragment: &str) -> HistoryToken {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let segments = split_segments(fragment);
    let mut input = TokenSlice::new(&segments);

    let kind = token_kind(&mut input, fragment);

    let remaining = input.eof_offset();
    if remaining > 0 {
        debug!(fragment, remaining; "Ignored trailing fragment segments");
    }

    match HistoryToken::new(kind) {
        Ok(token) => {
            trace!(token = token.url_fragment(); "Parsed fragment");
            token
        }
        Err(err) => {
            debug!(fragment, error = err.to_string(); "Parsed state is invalid");
            HistoryToken::unknown(fragment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments_of(fragment: &str) -> Vec<String> {
        split_segments(fragment)
    }

    #[test]
    fn test_split_segments_trims_empty_ends() {
        assert_eq!(segments_of("/a/b/"), vec!["a", "b"]);
        assert_eq!(segments_of("//a//b"), vec!["a", "", "b"]);
        assert!(segments_of("/").is_empty());
        assert!(segments_of("").is_empty());
    }

    #[test]
    fn test_split_segments_decodes() {
        assert_eq!(segments_of("/x/=12%2B3"), vec!["x", "=12+3"]);
        assert_eq!(segments_of("/a%2Fb"), vec!["a/b"]);
    }

    #[test]
    fn test_offset_and_count() {
        let segments = segments_of("offset/5/count/7/rest");
        let mut input = TokenSlice::new(&segments);
        assert_eq!(
            offset_and_count(&mut input),
            OffsetAndCount::new(Some(5), Some(7))
        );
        assert_eq!(input.eof_offset(), 1);
    }

    #[test]
    fn test_offset_without_number_is_left_unconsumed() {
        let segments = segments_of("offset/many");
        let mut input = TokenSlice::new(&segments);
        assert_eq!(offset_and_count(&mut input), OffsetAndCount::EMPTY);
        assert_eq!(input.eof_offset(), 2);
    }

    #[test]
    fn test_save_value() {
        let segments = segments_of("save/7");
        let mut input = TokenSlice::new(&segments);
        assert_eq!(
            save(&mut input, |text| text
                .parse::<u32>()
                .map_err(|_| ValueError::InvalidNumber(text.to_string()))),
            Some(Some(7))
        );

        let segments = segments_of("save");
        let mut input = TokenSlice::new(&segments);
        assert_eq!(save(&mut input, |text| Ok(text.to_string())), Some(None));

        let segments = segments_of("open/7");
        let mut input = TokenSlice::new(&segments);
        assert_eq!(save(&mut input, |text| Ok(text.to_string())), None);
    }

    #[test]
    fn test_anchor_not_allowed_is_left_unconsumed() {
        let segments = segments_of("B2:C3/left/clear");
        let mut input = TokenSlice::new(&segments);
        let selection = anchored_selection(&mut input, Selection::parse_cell).unwrap();
        assert_eq!(selection.anchor(), Anchor::BottomRight);
        assert_eq!(input.eof_offset(), 2);
    }

    #[test]
    fn test_single_cell_anchor_is_normalized() {
        let segments = segments_of("A1/top-left");
        let mut input = TokenSlice::new(&segments);
        let selection = anchored_selection(&mut input, Selection::parse_cell).unwrap();
        assert_eq!(selection.anchor(), Anchor::None);
        assert_eq!(input.eof_offset(), 0);
    }
}
