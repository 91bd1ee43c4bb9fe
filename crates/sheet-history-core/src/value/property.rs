//! Editable cell and spreadsheet properties, plus clipboard kinds.

use std::{fmt, str::FromStr};

use crate::{
    error::ValueError,
    value::{ValueKind, style::StyleProperty},
};

/// The pattern editors offered for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    DateFormat,
    DateParse,
    DateTimeFormat,
    DateTimeParse,
    NumberFormat,
    NumberParse,
    TextFormat,
    TimeFormat,
    TimeParse,
}

impl PatternKind {
    pub const ALL: [Self; 9] = [
        Self::DateFormat,
        Self::DateParse,
        Self::DateTimeFormat,
        Self::DateTimeParse,
        Self::NumberFormat,
        Self::NumberParse,
        Self::TextFormat,
        Self::TimeFormat,
        Self::TimeParse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateFormat => "date-format",
            Self::DateParse => "date-parse",
            Self::DateTimeFormat => "date-time-format",
            Self::DateTimeParse => "date-time-parse",
            Self::NumberFormat => "number-format",
            Self::NumberParse => "number-parse",
            Self::TextFormat => "text-format",
            Self::TimeFormat => "time-format",
            Self::TimeParse => "time-parse",
        }
    }
}

impl FromStr for PatternKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::invalid("pattern kind", s))
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property edited through a cell dialog.
///
/// Rendered as one fragment segment, except [`CellProperty::Style`] and
/// [`CellProperty::Pattern`] which take two (`style/color`,
/// `pattern/date-format`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellProperty {
    Formula,
    Formatter,
    Parser,
    Validator,
    ValueType,
    Locale,
    Currency,
    DateTimeSymbols,
    DecimalNumberSymbols,
    Style(StyleProperty),
    Pattern(PatternKind),
}

impl CellProperty {
    /// Single-segment properties, in fragment keyword order.
    pub const SIMPLE: [Self; 9] = [
        Self::Formula,
        Self::Formatter,
        Self::Parser,
        Self::Validator,
        Self::ValueType,
        Self::Locale,
        Self::Currency,
        Self::DateTimeSymbols,
        Self::DecimalNumberSymbols,
    ];

    /// The leading fragment keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Formula => "formula",
            Self::Formatter => "formatter",
            Self::Parser => "parser",
            Self::Validator => "validator",
            Self::ValueType => "valueType",
            Self::Locale => "locale",
            Self::Currency => "currency",
            Self::DateTimeSymbols => "dateTimeSymbols",
            Self::DecimalNumberSymbols => "decimalNumberSymbols",
            Self::Style(_) => "style",
            Self::Pattern(_) => "pattern",
        }
    }

    /// Looks up a single-segment property by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::SIMPLE
            .into_iter()
            .find(|property| property.keyword() == keyword)
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Formula | Self::Pattern(_) => ValueKind::Text,
            Self::Formatter | Self::Parser | Self::Validator => ValueKind::Selector,
            Self::ValueType => ValueKind::ValueType,
            Self::Locale => ValueKind::Locale,
            Self::Currency => ValueKind::Currency,
            Self::DateTimeSymbols => ValueKind::DateTimeSymbols,
            Self::DecimalNumberSymbols => ValueKind::DecimalNumberSymbols,
            Self::Style(style) => ValueKind::Style(style),
        }
    }
}

impl fmt::Display for CellProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(style) => write!(f, "style/{style}"),
            Self::Pattern(kind) => write!(f, "pattern/{kind}"),
            _ => f.write_str(self.keyword()),
        }
    }
}

/// A spreadsheet-wide default edited through the metadata panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataProperty {
    Currency,
    DateFormatter,
    DateParser,
    DateTimeFormatter,
    DateTimeParser,
    DateTimeSymbols,
    DecimalNumberSymbols,
    DefaultYear,
    Locale,
    NumberFormatter,
    NumberParser,
    Precision,
    RoundingMode,
    TextFormatter,
    TimeFormatter,
    TimeParser,
    TwoDigitYear,
    ValueSeparator,
}

impl MetadataProperty {
    pub const ALL: [Self; 18] = [
        Self::Currency,
        Self::DateFormatter,
        Self::DateParser,
        Self::DateTimeFormatter,
        Self::DateTimeParser,
        Self::DateTimeSymbols,
        Self::DecimalNumberSymbols,
        Self::DefaultYear,
        Self::Locale,
        Self::NumberFormatter,
        Self::NumberParser,
        Self::Precision,
        Self::RoundingMode,
        Self::TextFormatter,
        Self::TimeFormatter,
        Self::TimeParser,
        Self::TwoDigitYear,
        Self::ValueSeparator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::DateFormatter => "dateFormatter",
            Self::DateParser => "dateParser",
            Self::DateTimeFormatter => "dateTimeFormatter",
            Self::DateTimeParser => "dateTimeParser",
            Self::DateTimeSymbols => "dateTimeSymbols",
            Self::DecimalNumberSymbols => "decimalNumberSymbols",
            Self::DefaultYear => "defaultYear",
            Self::Locale => "locale",
            Self::NumberFormatter => "numberFormatter",
            Self::NumberParser => "numberParser",
            Self::Precision => "precision",
            Self::RoundingMode => "roundingMode",
            Self::TextFormatter => "textFormatter",
            Self::TimeFormatter => "timeFormatter",
            Self::TimeParser => "timeParser",
            Self::TwoDigitYear => "twoDigitYear",
            Self::ValueSeparator => "valueSeparator",
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Currency => ValueKind::Currency,
            Self::DateFormatter
            | Self::DateParser
            | Self::DateTimeFormatter
            | Self::DateTimeParser
            | Self::NumberFormatter
            | Self::NumberParser
            | Self::TextFormatter
            | Self::TimeFormatter
            | Self::TimeParser => ValueKind::Selector,
            Self::DateTimeSymbols => ValueKind::DateTimeSymbols,
            Self::DecimalNumberSymbols => ValueKind::DecimalNumberSymbols,
            Self::DefaultYear | Self::Precision => ValueKind::Number { max: u32::MAX },
            Self::TwoDigitYear => ValueKind::Number { max: 99 },
            Self::Locale => ValueKind::Locale,
            Self::RoundingMode => ValueKind::RoundingMode,
            Self::ValueSeparator => ValueKind::Character,
        }
    }
}

impl FromStr for MetadataProperty {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.as_str() == s)
            .ok_or_else(|| ValueError::invalid("metadata property", s))
    }
}

impl fmt::Display for MetadataProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardOperation {
    Copy,
    Cut,
    Paste,
}

impl ClipboardOperation {
    pub const ALL: [Self; 3] = [Self::Copy, Self::Cut, Self::Paste];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
        }
    }
}

impl FromStr for ClipboardOperation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ValueError::invalid("clipboard operation", s))
    }
}

impl fmt::Display for ClipboardOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the selected cells a clipboard operation transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardValueKind {
    Cell,
    Formula,
    Formatter,
    Parser,
    Style,
    Validator,
    ValueType,
    Value,
}

impl ClipboardValueKind {
    pub const ALL: [Self; 8] = [
        Self::Cell,
        Self::Formula,
        Self::Formatter,
        Self::Parser,
        Self::Style,
        Self::Validator,
        Self::ValueType,
        Self::Value,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Formula => "formula",
            Self::Formatter => "formatter",
            Self::Parser => "parser",
            Self::Style => "style",
            Self::Validator => "validator",
            Self::ValueType => "value-type",
            Self::Value => "value",
        }
    }
}

impl FromStr for ClipboardValueKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::invalid("clipboard value kind", s))
    }
}

impl fmt::Display for ClipboardValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_property_keywords() {
        assert_eq!(
            CellProperty::from_keyword("valueType"),
            Some(CellProperty::ValueType)
        );
        assert_eq!(CellProperty::from_keyword("style"), None);
        assert_eq!(CellProperty::from_keyword("Formula"), None);
    }

    #[test]
    fn test_cell_property_display() {
        assert_eq!(CellProperty::Formula.to_string(), "formula");
        assert_eq!(
            CellProperty::Style(StyleProperty::TextAlign).to_string(),
            "style/text-align"
        );
        assert_eq!(
            CellProperty::Pattern(PatternKind::DateTimeFormat).to_string(),
            "pattern/date-time-format"
        );
    }

    #[test]
    fn test_metadata_property_round_trip() {
        for property in MetadataProperty::ALL {
            assert_eq!(property.as_str().parse::<MetadataProperty>(), Ok(property));
        }
        assert!("twodigityear".parse::<MetadataProperty>().is_err());
    }

    #[test]
    fn test_metadata_value_kinds() {
        assert_eq!(
            MetadataProperty::TwoDigitYear.value_kind(),
            ValueKind::Number { max: 99 }
        );
        assert_eq!(
            MetadataProperty::TimeParser.value_kind(),
            ValueKind::Selector
        );
    }

    #[test]
    fn test_clipboard_keywords() {
        assert_eq!("cut".parse::<ClipboardOperation>(), Ok(ClipboardOperation::Cut));
        assert_eq!(
            "value-type".parse::<ClipboardValueKind>(),
            Ok(ClipboardValueKind::ValueType)
        );
        assert!("everything".parse::<ClipboardValueKind>().is_err());
    }
}
