//! Identifiers and names carried by tokens.

use std::{fmt, str::FromStr};

use crate::error::ValueError;

/// Identifies a stored spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpreadsheetId(u64);

impl SpreadsheetId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl FromStr for SpreadsheetId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::invalid("spreadsheet id", s));
        }
        s.parse()
            .map(Self)
            .map_err(|_| ValueError::invalid("spreadsheet id", s))
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user-visible name of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpreadsheetName(String);

impl SpreadsheetName {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValueError::Empty("spreadsheet name"));
        }
        if name.chars().count() > Self::MAX_LENGTH || name.chars().any(char::is_control) {
            return Err(ValueError::invalid("spreadsheet name", name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SpreadsheetName {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SpreadsheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks `[A-Za-z][A-Za-z0-9-]*` with a length limit.
fn is_identifier(text: &str, max_length: usize) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        && text.len() <= max_length
}

/// The name of an installed plugin.
///
/// The keywords that follow `/plugin/` in a list fragment (`offset`, `count`
/// and `reload`) cannot be plugin names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginName(String);

impl PluginName {
    pub const MAX_LENGTH: usize = 255;

    /// Keywords that take priority over plugin names after `/plugin/`.
    pub const RESERVED: [&'static str; 3] = ["offset", "count", "reload"];

    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        if Self::RESERVED.contains(&name.as_str()) {
            return Err(ValueError::Reserved(name));
        }
        if !is_identifier(&name, Self::MAX_LENGTH) {
            return Err(ValueError::invalid("plugin name", name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PluginName {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of a form attached to a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormName(String);

impl FormName {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        if !is_identifier(&name, Self::MAX_LENGTH) {
            return Err(ValueError::invalid("form name", name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FormName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FormName> for String {
    fn from(name: FormName) -> Self {
        name.0
    }
}

impl FromStr for FormName {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for FormName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
