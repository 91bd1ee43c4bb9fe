//! Locale symbol tables, exchanged in fragments as JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

fn from_json<'a, T: Deserialize<'a>>(kind: &'static str, text: &'a str) -> Result<T, ValueError> {
    serde_json::from_str(text).map_err(|err| ValueError::Json {
        kind,
        message: err.to_string(),
    })
}

fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

/// Names used when formatting and parsing dates and times.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateTimeSymbols {
    ampms: Vec<String>,
    month_names: Vec<String>,
    month_name_abbreviations: Vec<String>,
    weekday_names: Vec<String>,
    weekday_name_abbreviations: Vec<String>,
}

impl DateTimeSymbols {
    /// Creates symbols after checking every table has the expected length:
    /// 2 am/pm markers, 12 months and 7 weekdays.
    pub fn new(
        ampms: Vec<String>,
        month_names: Vec<String>,
        month_name_abbreviations: Vec<String>,
        weekday_names: Vec<String>,
        weekday_name_abbreviations: Vec<String>,
    ) -> Result<Self, ValueError> {
        let symbols = Self {
            ampms,
            month_names,
            month_name_abbreviations,
            weekday_names,
            weekday_name_abbreviations,
        };
        symbols.validate()?;
        Ok(symbols)
    }

    fn validate(&self) -> Result<(), ValueError> {
        let checks = [
            ("ampms", &self.ampms, 2),
            ("monthNames", &self.month_names, 12),
            ("monthNameAbbreviations", &self.month_name_abbreviations, 12),
            ("weekdayNames", &self.weekday_names, 7),
            ("weekdayNameAbbreviations", &self.weekday_name_abbreviations, 7),
        ];
        for (field, values, expected) in checks {
            if values.len() != expected {
                return Err(ValueError::Json {
                    kind: "date time symbols",
                    message: format!("{field} requires {expected} entries, got {}", values.len()),
                });
            }
        }
        Ok(())
    }

    pub fn ampms(&self) -> &[String] {
        &self.ampms
    }

    pub fn month_names(&self) -> &[String] {
        &self.month_names
    }

    pub fn weekday_names(&self) -> &[String] {
        &self.weekday_names
    }
}

impl FromStr for DateTimeSymbols {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Self = from_json("date time symbols", s)?;
        symbols.validate()?;
        Ok(symbols)
    }
}

impl fmt::Display for DateTimeSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// Characters and strings used when formatting and parsing numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DecimalNumberSymbols {
    negative_sign: char,
    positive_sign: char,
    zero_digit: char,
    currency_symbol: String,
    decimal_separator: char,
    exponent_symbol: String,
    group_separator: char,
    infinity_symbol: String,
    monetary_decimal_separator: char,
    nan_symbol: String,
    percent_symbol: char,
    permill_symbol: char,
}

impl DecimalNumberSymbols {
    /// Symbols for `en`.
    pub fn english() -> Self {
        Self {
            negative_sign: '-',
            positive_sign: '+',
            zero_digit: '0',
            currency_symbol: "$".to_string(),
            decimal_separator: '.',
            exponent_symbol: "E".to_string(),
            group_separator: ',',
            infinity_symbol: "∞".to_string(),
            monetary_decimal_separator: '.',
            nan_symbol: "NaN".to_string(),
            percent_symbol: '%',
            permill_symbol: '‰',
        }
    }

    /// Replaces the decimal and group separators.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Json`] when both separators are the same character.
    pub fn with_separators(mut self, decimal: char, group: char) -> Result<Self, ValueError> {
        self.decimal_separator = decimal;
        self.group_separator = group;
        self.validate()?;
        Ok(self)
    }

    pub fn negative_sign(&self) -> char {
        self.negative_sign
    }

    pub fn positive_sign(&self) -> char {
        self.positive_sign
    }

    pub fn zero_digit(&self) -> char {
        self.zero_digit
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn exponent_symbol(&self) -> &str {
        &self.exponent_symbol
    }

    pub fn group_separator(&self) -> char {
        self.group_separator
    }

    pub fn infinity_symbol(&self) -> &str {
        &self.infinity_symbol
    }

    pub fn monetary_decimal_separator(&self) -> char {
        self.monetary_decimal_separator
    }

    pub fn nan_symbol(&self) -> &str {
        &self.nan_symbol
    }

    pub fn percent_symbol(&self) -> char {
        self.percent_symbol
    }

    pub fn permill_symbol(&self) -> char {
        self.permill_symbol
    }

    fn validate(&self) -> Result<(), ValueError> {
        if self.decimal_separator == self.group_separator {
            return Err(ValueError::Json {
                kind: "decimal number symbols",
                message: format!(
                    "decimal separator and group separator are both `{}`",
                    self.decimal_separator
                ),
            });
        }
        Ok(())
    }
}

impl FromStr for DecimalNumberSymbols {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Self = from_json("decimal number symbols", s)?;
        symbols.validate()?;
        Ok(symbols)
    }
}

impl fmt::Display for DecimalNumberSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}
