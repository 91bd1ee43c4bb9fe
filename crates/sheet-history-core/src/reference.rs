//! Cell, column, row and label references.
//!
//! Columns and rows are stored **0-indexed** and rendered in A1 notation:
//! column `0` is `A`, row `0` is `1`. Ranges are inclusive and normalized so
//! that `begin <= end` on every axis. A range spanning a whole axis renders as
//! `*` and `*` parses back to it.

use std::{fmt, str::FromStr};

use crate::error::ValueError;

/// Number of columns in a sheet (`A..=XFD`).
pub const MAX_COLUMNS: u32 = 16_384;

/// Number of rows in a sheet.
pub const MAX_ROWS: u32 = 1_048_576;

const ALL: &str = "*";

/// A single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnRef(u32);

impl ColumnRef {
    /// Creates a column from its 0-based index.
    pub fn new(index: u32) -> Result<Self, ValueError> {
        if index >= MAX_COLUMNS {
            return Err(ValueError::InvalidColumn(index.to_string()));
        }
        Ok(Self(index))
    }

    /// The 0-based column index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Parses the leading column letters of `text`, returning the column and
    /// the number of bytes consumed.
    fn parse_prefix(text: &str) -> Result<(Self, usize), ValueError> {
        let letters = text
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if letters == 0 {
            return Err(ValueError::InvalidColumn(text.to_string()));
        }

        let mut value: u32 = 0;
        for b in text[..letters].bytes() {
            let digit = u32::from(b.to_ascii_uppercase() - b'A') + 1;
            value = value
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .filter(|v| *v <= MAX_COLUMNS)
                .ok_or_else(|| ValueError::InvalidColumn(text.to_string()))?;
        }

        Ok((Self(value - 1), letters))
    }
}

impl FromStr for ColumnRef {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, consumed) = Self::parse_prefix(s)?;
        if consumed != s.len() {
            return Err(ValueError::InvalidColumn(s.to_string()));
        }
        Ok(column)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = self.0 + 1;
        let mut letters = Vec::with_capacity(3);
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        letters.iter().rev().try_for_each(|c| write!(f, "{c}"))
    }
}

/// A single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowRef(u32);

impl RowRef {
    /// Creates a row from its 0-based index.
    pub fn new(index: u32) -> Result<Self, ValueError> {
        if index >= MAX_ROWS {
            return Err(ValueError::InvalidRow((u64::from(index) + 1).to_string()));
        }
        Ok(Self(index))
    }

    /// The 0-based row index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl FromStr for RowRef {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::InvalidRow(s.to_string()));
        }
        let one_based: u32 = s
            .parse()
            .map_err(|_| ValueError::InvalidRow(s.to_string()))?;
        if one_based == 0 || one_based > MAX_ROWS {
            return Err(ValueError::InvalidRow(s.to_string()));
        }
        Ok(Self(one_based - 1))
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// A single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    column: ColumnRef,
    row: RowRef,
}

impl CellRef {
    pub fn new(column: ColumnRef, row: RowRef) -> Self {
        Self { column, row }
    }

    /// The top-left cell of every sheet.
    pub fn home() -> Self {
        Self::new(ColumnRef(0), RowRef(0))
    }

    pub fn column(self) -> ColumnRef {
        self.column
    }

    pub fn row(self) -> RowRef {
        self.row
    }
}

impl FromStr for CellRef {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidCell(s.to_string());
        let (column, consumed) = ColumnRef::parse_prefix(s).map_err(|_| invalid())?;
        let row = s[consumed..].parse::<RowRef>().map_err(|_| invalid())?;
        Ok(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Splits `text` on `:` into exactly one or two non-empty parts.
fn split_range(text: &str) -> Option<(&str, Option<&str>)> {
    match text.split_once(':') {
        None => Some((text, None)),
        Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains(':') => Some((a, Some(b))),
        Some(_) => None,
    }
}

/// An inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    begin: CellRef,
    end: CellRef,
}

impl CellRange {
    /// Creates a range from any two corners.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        let begin = CellRef::new(a.column.min(b.column), a.row.min(b.row));
        let end = CellRef::new(a.column.max(b.column), a.row.max(b.row));
        Self { begin, end }
    }

    /// Every cell of the sheet.
    pub fn all() -> Self {
        Self::new(
            CellRef::home(),
            CellRef::new(ColumnRef(MAX_COLUMNS - 1), RowRef(MAX_ROWS - 1)),
        )
    }

    pub fn begin(self) -> CellRef {
        self.begin
    }

    pub fn end(self) -> CellRef {
        self.end
    }

    pub fn is_single(self) -> bool {
        self.begin == self.end
    }

    pub fn contains(self, cell: CellRef) -> bool {
        (self.begin.column..=self.end.column).contains(&cell.column)
            && (self.begin.row..=self.end.row).contains(&cell.row)
    }

    pub fn contains_range(self, other: CellRange) -> bool {
        self.contains(other.begin) && self.contains(other.end)
    }
}

impl FromStr for CellRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::all());
        }
        match split_range(s).ok_or_else(|| ValueError::InvalidCell(s.to_string()))? {
            (a, None) => {
                let cell = a.parse()?;
                Ok(Self::new(cell, cell))
            }
            (a, Some(b)) => Ok(Self::new(a.parse()?, b.parse()?)),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::all() {
            f.write_str(ALL)
        } else if self.is_single() {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

/// An inclusive span of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    begin: ColumnRef,
    end: ColumnRef,
}

impl ColumnRange {
    pub fn new(a: ColumnRef, b: ColumnRef) -> Self {
        Self {
            begin: a.min(b),
            end: a.max(b),
        }
    }

    pub fn all() -> Self {
        Self::new(ColumnRef(0), ColumnRef(MAX_COLUMNS - 1))
    }

    pub fn begin(self) -> ColumnRef {
        self.begin
    }

    pub fn end(self) -> ColumnRef {
        self.end
    }

    pub fn is_single(self) -> bool {
        self.begin == self.end
    }

    pub fn contains(self, column: ColumnRef) -> bool {
        (self.begin..=self.end).contains(&column)
    }
}

impl FromStr for ColumnRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::all());
        }
        match split_range(s).ok_or_else(|| ValueError::InvalidColumn(s.to_string()))? {
            (a, None) => {
                let column = a.parse()?;
                Ok(Self::new(column, column))
            }
            (a, Some(b)) => Ok(Self::new(a.parse()?, b.parse()?)),
        }
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::all() {
            f.write_str(ALL)
        } else if self.is_single() {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

/// An inclusive span of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    begin: RowRef,
    end: RowRef,
}

impl RowRange {
    pub fn new(a: RowRef, b: RowRef) -> Self {
        Self {
            begin: a.min(b),
            end: a.max(b),
        }
    }

    pub fn all() -> Self {
        Self::new(RowRef(0), RowRef(MAX_ROWS - 1))
    }

    pub fn begin(self) -> RowRef {
        self.begin
    }

    pub fn end(self) -> RowRef {
        self.end
    }

    pub fn is_single(self) -> bool {
        self.begin == self.end
    }

    pub fn contains(self, row: RowRef) -> bool {
        (self.begin..=self.end).contains(&row)
    }
}

impl FromStr for RowRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::all());
        }
        match split_range(s).ok_or_else(|| ValueError::InvalidRow(s.to_string()))? {
            (a, None) => {
                let row = a.parse()?;
                Ok(Self::new(row, row))
            }
            (a, Some(b)) => Ok(Self::new(a.parse()?, b.parse()?)),
        }
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::all() {
            f.write_str(ALL)
        } else if self.is_single() {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

/// The name of a label mapping, e.g. `Total_2024`.
///
/// Label names start with a letter or `_`, continue with letters, digits,
/// `_` or `.`, and must not be readable as a cell reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelName(String);

impl LabelName {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');

        if !valid_start
            || !valid_rest
            || name.len() > Self::MAX_LENGTH
            || name.parse::<CellRef>().is_ok()
        {
            return Err(ValueError::InvalidLabel(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LabelName {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> CellRef {
        text.parse().expect("valid cell")
    }

    #[test]
    fn test_column_letters() {
        assert_eq!("A".parse::<ColumnRef>().unwrap().index(), 0);
        assert_eq!("z".parse::<ColumnRef>().unwrap().index(), 25);
        assert_eq!("AA".parse::<ColumnRef>().unwrap().index(), 26);
        assert_eq!("XFD".parse::<ColumnRef>().unwrap().index(), MAX_COLUMNS - 1);
        assert!("XFE".parse::<ColumnRef>().is_err());
        assert!("A1".parse::<ColumnRef>().is_err());
        assert_eq!(ColumnRef::new(27).unwrap().to_string(), "AB");
    }

    #[test]
    fn test_row_numbers() {
        assert_eq!("1".parse::<RowRef>().unwrap().index(), 0);
        assert!("0".parse::<RowRef>().is_err());
        assert!("1048577".parse::<RowRef>().is_err());
        assert!("+1".parse::<RowRef>().is_err());
        assert_eq!(RowRef::new(9).unwrap().to_string(), "10");
    }

    #[test]
    fn test_cell_parse_and_display() {
        let c = cell("bc32");
        assert_eq!(c.column().index(), 54);
        assert_eq!(c.row().index(), 31);
        assert_eq!(c.to_string(), "BC32");
        assert!("A".parse::<CellRef>().is_err());
        assert!("1".parse::<CellRef>().is_err());
        assert!("A1B".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_cell_range_normalizes() {
        let range: CellRange = "C3:B2".parse().unwrap();
        assert_eq!(range.begin(), cell("B2"));
        assert_eq!(range.end(), cell("C3"));
        assert_eq!(range.to_string(), "B2:C3");

        let mixed: CellRange = "B3:C2".parse().unwrap();
        assert_eq!(mixed.to_string(), "B2:C3");
    }

    #[test]
    fn test_all_ranges_render_as_star() {
        assert_eq!(CellRange::all().to_string(), "*");
        assert_eq!("*".parse::<CellRange>().unwrap(), CellRange::all());
        assert_eq!(ColumnRange::all().to_string(), "*");
        assert_eq!(RowRange::all().to_string(), "*");
        assert_eq!("A:XFD".parse::<ColumnRange>().unwrap().to_string(), "*");
    }

    #[test]
    fn test_malformed_ranges() {
        assert!("A1:".parse::<CellRange>().is_err());
        assert!(":A1".parse::<CellRange>().is_err());
        assert!("A1:B2:C3".parse::<CellRange>().is_err());
        assert!("A:1".parse::<ColumnRange>().is_err());
        assert!("1:B".parse::<RowRange>().is_err());
    }

    #[test]
    fn test_cell_range_contains() {
        let range: CellRange = "B2:D4".parse().unwrap();
        assert!(range.contains(cell("C3")));
        assert!(!range.contains(cell("A1")));
        assert!(range.contains_range("B2:C3".parse().unwrap()));
        assert!(!range.contains_range("C3:E5".parse().unwrap()));
    }

    #[test]
    fn test_label_names() {
        assert!(LabelName::new("Label123").is_ok());
        assert!(LabelName::new("_total.sum").is_ok());
        assert!(LabelName::new("A1").is_err());
        assert!(LabelName::new("1abc").is_err());
        assert!(LabelName::new("").is_err());
        assert!(LabelName::new("with space").is_err());
        assert!(LabelName::new("*").is_err());
    }
}
