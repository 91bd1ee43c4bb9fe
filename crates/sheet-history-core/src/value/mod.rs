//! Values carried by save tokens.
//!
//! Every save token holds a [`SaveValue`]. Which variant is legal depends on
//! the target: a cell formula takes text, a metadata locale takes a
//! [`LocaleTag`], a plugin upload takes a [`BrowserFile`] and so on. The
//! target describes its expectation as a [`ValueKind`], which both parses
//! fragment text and checks values handed to transitions.

pub mod form;
pub mod navigation;
pub mod property;
pub mod scalar;
pub mod sort;
pub mod style;
pub mod symbols;

use std::fmt;

use crate::{
    error::ValueError,
    name::SpreadsheetName,
    selection::Selection,
};

pub use form::{BrowserFile, Form, FormField};
pub use navigation::{Navigation, NavigationAmount, NavigationDirection};
pub use property::{
    CellProperty, ClipboardOperation, ClipboardValueKind, MetadataProperty, PatternKind,
};
pub use scalar::{CurrencyCode, LocaleTag, RoundingMode, Selector, ValueType};
pub use sort::{NamedComparator, SortComparators, SortDirection, SortEntry, SortKey};
pub use style::{StyleProperty, StyleValue};
pub use symbols::{DateTimeSymbols, DecimalNumberSymbols};

/// A value saved by a save token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaveValue {
    Text(String),
    Selector(Selector),
    ValueType(ValueType),
    Locale(LocaleTag),
    Currency(CurrencyCode),
    DateTimeSymbols(DateTimeSymbols),
    DecimalNumberSymbols(DecimalNumberSymbols),
    Style(StyleValue),
    Number(u32),
    RoundingMode(RoundingMode),
    Character(char),
    SpreadsheetName(SpreadsheetName),
    Comparators(SortComparators),
    Selection(Selection),
    Form(Form),
    File(BrowserFile),
}

impl SaveValue {
    /// A short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Selector(_) => "selector",
            Self::ValueType(_) => "value type",
            Self::Locale(_) => "locale",
            Self::Currency(_) => "currency",
            Self::DateTimeSymbols(_) => "date time symbols",
            Self::DecimalNumberSymbols(_) => "decimal number symbols",
            Self::Style(_) => "style value",
            Self::Number(_) => "number",
            Self::RoundingMode(_) => "rounding mode",
            Self::Character(_) => "character",
            Self::SpreadsheetName(_) => "spreadsheet name",
            Self::Comparators(_) => "sort comparators",
            Self::Selection(_) => "selection",
            Self::Form(_) => "form",
            Self::File(_) => "file",
        }
    }
}

/// Renders the text form read back by [`ValueKind::parse`].
impl fmt::Display for SaveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Selector(selector) => write!(f, "{selector}"),
            Self::ValueType(value_type) => write!(f, "{value_type}"),
            Self::Locale(locale) => write!(f, "{locale}"),
            Self::Currency(currency) => write!(f, "{currency}"),
            Self::DateTimeSymbols(symbols) => write!(f, "{symbols}"),
            Self::DecimalNumberSymbols(symbols) => write!(f, "{symbols}"),
            Self::Style(style) => write!(f, "{style}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::RoundingMode(mode) => write!(f, "{mode}"),
            Self::Character(c) => write!(f, "{c}"),
            Self::SpreadsheetName(name) => write!(f, "{name}"),
            Self::Comparators(comparators) => write!(f, "{comparators}"),
            Self::Selection(selection) => write!(f, "{selection}"),
            Self::Form(form) => write!(f, "{form}"),
            Self::File(file) => write!(f, "{file}"),
        }
    }
}

/// The kind of [`SaveValue`] a save target expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Any non-empty text.
    Text,
    Selector,
    ValueType,
    Locale,
    Currency,
    DateTimeSymbols,
    DecimalNumberSymbols,
    Style(StyleProperty),
    Number { max: u32 },
    RoundingMode,
    Character,
    SpreadsheetName,
    Comparators,
    /// A cell, cell range or label.
    Selection,
    Form,
    File,
}

impl ValueKind {
    /// Parses `text` as a value of this kind.
    pub fn parse(self, text: &str) -> Result<SaveValue, ValueError> {
        Ok(match self {
            Self::Text => {
                if text.is_empty() {
                    return Err(ValueError::Empty("text"));
                }
                SaveValue::Text(text.to_string())
            }
            Self::Selector => SaveValue::Selector(text.parse()?),
            Self::ValueType => SaveValue::ValueType(text.parse()?),
            Self::Locale => SaveValue::Locale(text.parse()?),
            Self::Currency => SaveValue::Currency(text.parse()?),
            Self::DateTimeSymbols => SaveValue::DateTimeSymbols(text.parse()?),
            Self::DecimalNumberSymbols => SaveValue::DecimalNumberSymbols(text.parse()?),
            Self::Style(property) => SaveValue::Style(property.parse_value(text)?),
            Self::Number { max } => match text.parse::<u32>() {
                Ok(number) if number <= max => SaveValue::Number(number),
                _ => return Err(ValueError::InvalidNumber(text.to_string())),
            },
            Self::RoundingMode => SaveValue::RoundingMode(text.parse()?),
            Self::Character => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => SaveValue::Character(c),
                    _ => return Err(ValueError::invalid("character", text)),
                }
            }
            Self::SpreadsheetName => SaveValue::SpreadsheetName(text.parse()?),
            Self::Comparators => SaveValue::Comparators(text.parse()?),
            Self::Selection => SaveValue::Selection(Selection::parse_cell(text)?),
            Self::Form => SaveValue::Form(text.parse()?),
            Self::File => SaveValue::File(text.parse()?),
        })
    }

    /// Returns true when `value` is a legal value of this kind.
    pub fn accepts(self, value: &SaveValue) -> bool {
        match (self, value) {
            (Self::Text, SaveValue::Text(text)) => !text.is_empty(),
            (Self::Selector, SaveValue::Selector(_))
            | (Self::ValueType, SaveValue::ValueType(_))
            | (Self::Locale, SaveValue::Locale(_))
            | (Self::Currency, SaveValue::Currency(_))
            | (Self::DateTimeSymbols, SaveValue::DateTimeSymbols(_))
            | (Self::DecimalNumberSymbols, SaveValue::DecimalNumberSymbols(_))
            | (Self::RoundingMode, SaveValue::RoundingMode(_))
            | (Self::Character, SaveValue::Character(_))
            | (Self::SpreadsheetName, SaveValue::SpreadsheetName(_))
            | (Self::Comparators, SaveValue::Comparators(_))
            | (Self::Form, SaveValue::Form(_))
            | (Self::File, SaveValue::File(_)) => true,
            (Self::Style(property), SaveValue::Style(style)) => property.accepts(style),
            (Self::Number { max }, SaveValue::Number(number)) => *number <= max,
            (Self::Selection, SaveValue::Selection(selection)) => matches!(
                selection,
                Selection::Cell(_) | Selection::CellRange(_) | Selection::Label(_)
            ),
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Selector => f.write_str("selector"),
            Self::ValueType => f.write_str("value type"),
            Self::Locale => f.write_str("locale"),
            Self::Currency => f.write_str("currency"),
            Self::DateTimeSymbols => f.write_str("date time symbols"),
            Self::DecimalNumberSymbols => f.write_str("decimal number symbols"),
            Self::Style(property) => write!(f, "{property} value"),
            Self::Number { max } => write!(f, "number up to {max}"),
            Self::RoundingMode => f.write_str("rounding mode"),
            Self::Character => f.write_str("character"),
            Self::SpreadsheetName => f.write_str("spreadsheet name"),
            Self::Comparators => f.write_str("sort comparators"),
            Self::Selection => f.write_str("cell, cell range or label"),
            Self::Form => f.write_str("form"),
            Self::File => f.write_str("file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(
            ValueKind::Text.parse("=12+3"),
            Ok(SaveValue::Text("=12+3".to_string()))
        );
        assert!(ValueKind::Text.parse("").is_err());
        assert_eq!(
            ValueKind::Number { max: 99 }.parse("50"),
            Ok(SaveValue::Number(50))
        );
        assert!(ValueKind::Number { max: 99 }.parse("100").is_err());
        assert_eq!(ValueKind::Character.parse(","), Ok(SaveValue::Character(',')));
        assert!(ValueKind::Character.parse(",;").is_err());
        assert!(matches!(
            ValueKind::Selection.parse("B2:C3"),
            Ok(SaveValue::Selection(Selection::CellRange(_)))
        ));
    }

    #[test]
    fn test_accepts_matches_variant() {
        let locale = ValueKind::Locale.parse("en-AU").unwrap();
        assert!(ValueKind::Locale.accepts(&locale));
        assert!(!ValueKind::Currency.accepts(&locale));
        assert!(!ValueKind::Text.accepts(&SaveValue::Text(String::new())));

        let column = SaveValue::Selection(Selection::parse_column("B").unwrap());
        assert!(!ValueKind::Selection.accepts(&column));
    }

    #[test]
    fn test_style_kind_checks_property() {
        let kind = ValueKind::Style(StyleProperty::TextAlign);
        let value = kind.parse("left").unwrap();
        assert!(kind.accepts(&value));
        assert!(!ValueKind::Style(StyleProperty::VerticalAlign).accepts(&value));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let comparators = ValueKind::Comparators.parse("A=text DOWN").unwrap();
        assert_eq!(comparators.to_string(), "A=text DOWN");
        assert_eq!(
            ValueKind::Comparators.parse(&comparators.to_string()),
            Ok(comparators)
        );
    }
}
