//! Style properties and their values.

use std::{fmt, str::FromStr};

use crate::{color::Color, error::ValueError};

/// A style property that can be edited for a cell or set as a sheet default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    BackgroundColor,
    Color,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    TextAlign,
    VerticalAlign,
    TextDecorationLine,
    TextWrapping,
    Width,
    Height,
}

impl StyleProperty {
    pub const ALL: [Self; 12] = [
        Self::BackgroundColor,
        Self::Color,
        Self::FontFamily,
        Self::FontSize,
        Self::FontStyle,
        Self::FontWeight,
        Self::TextAlign,
        Self::VerticalAlign,
        Self::TextDecorationLine,
        Self::TextWrapping,
        Self::Width,
        Self::Height,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackgroundColor => "background-color",
            Self::Color => "color",
            Self::FontFamily => "font-family",
            Self::FontSize => "font-size",
            Self::FontStyle => "font-style",
            Self::FontWeight => "font-weight",
            Self::TextAlign => "text-align",
            Self::VerticalAlign => "vertical-align",
            Self::TextDecorationLine => "text-decoration-line",
            Self::TextWrapping => "text-wrapping",
            Self::Width => "width",
            Self::Height => "height",
        }
    }

    /// Keywords accepted by keyword-valued properties, empty otherwise.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::FontStyle => &["normal", "italic", "oblique"],
            Self::FontWeight => &["normal", "bold"],
            Self::TextAlign => &["left", "center", "right", "justify"],
            Self::VerticalAlign => &["top", "middle", "bottom"],
            Self::TextDecorationLine => &["none", "underline", "line-through", "overline"],
            Self::TextWrapping => &["clip", "overflow", "wrap"],
            _ => &[],
        }
    }

    /// Parses `text` as a value of this property.
    pub fn parse_value(self, text: &str) -> Result<StyleValue, ValueError> {
        let invalid = || ValueError::invalid(self.as_str(), text);
        match self {
            Self::BackgroundColor | Self::Color => Color::new(text).map(StyleValue::Color),
            Self::FontFamily => {
                if text.trim().is_empty() {
                    Err(ValueError::Empty("font family"))
                } else {
                    Ok(StyleValue::Text(text.to_string()))
                }
            }
            Self::FontSize => match text.parse::<u32>() {
                Ok(size) if size > 0 => Ok(StyleValue::Number(size)),
                _ => Err(invalid()),
            },
            Self::Width | Self::Height => text
                .strip_suffix("px")
                .and_then(|px| px.parse::<u32>().ok())
                .map(StyleValue::Length)
                .ok_or_else(invalid),
            _ => self
                .keywords()
                .iter()
                .find(|keyword| **keyword == text)
                .map(|keyword| StyleValue::Keyword(*keyword))
                .ok_or_else(invalid),
        }
    }

    /// Returns true when `value` is a legal value of this property.
    pub fn accepts(self, value: &StyleValue) -> bool {
        match (self, value) {
            (Self::BackgroundColor | Self::Color, StyleValue::Color(_)) => true,
            (Self::FontFamily, StyleValue::Text(text)) => !text.trim().is_empty(),
            (Self::FontSize, StyleValue::Number(size)) => *size > 0,
            (Self::Width | Self::Height, StyleValue::Length(_)) => true,
            (_, StyleValue::Keyword(keyword)) => self.keywords().contains(keyword),
            _ => false,
        }
    }
}

impl FromStr for StyleProperty {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.as_str() == s)
            .ok_or_else(|| ValueError::invalid("style property", s))
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a [`StyleProperty`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleValue {
    Color(Color),
    Text(String),
    Number(u32),
    /// A length in pixels, rendered `<n>px`.
    Length(u32),
    Keyword(&'static str),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => write!(f, "{color}"),
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Length(px) => write!(f, "{px}px"),
            Self::Keyword(keyword) => f.write_str(keyword),
        }
    }
}
