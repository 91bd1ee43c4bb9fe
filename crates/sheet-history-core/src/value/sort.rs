//! Sort comparator lists, e.g. `A=text;B=number DOWN,date`.
//!
//! Each `;`-separated entry names a column (or row) and the comparators
//! applied to it in order. A comparator sorts `UP` unless followed by `DOWN`.

use std::{collections::HashSet, fmt, str::FromStr};

use crate::{
    error::ValueError,
    reference::{ColumnRef, RowRef},
    selection::SelectionKind,
    value::scalar::is_lower_identifier,
};

/// The column or row an entry sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Column(ColumnRef),
    Row(RowRef),
}

impl SortKey {
    pub fn kind(self) -> SelectionKind {
        match self {
            Self::Column(_) => SelectionKind::Column,
            Self::Row(_) => SelectionKind::Row,
        }
    }
}

impl FromStr for SortKey {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ColumnRef>()
            .map(Self::Column)
            .or_else(|_| s.parse::<RowRef>().map(Self::Row))
            .map_err(|_| ValueError::invalid("sort column or row", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => write!(f, "{column}"),
            Self::Row(row) => write!(f, "{row}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Up,
    Down,
}

/// A comparator name with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedComparator {
    name: String,
    direction: SortDirection,
}

impl NamedComparator {
    pub fn new(name: impl Into<String>, direction: SortDirection) -> Result<Self, ValueError> {
        let name = name.into();
        if !is_lower_identifier(&name) {
            return Err(ValueError::invalid("comparator name", name));
        }
        Ok(Self { name, direction })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl FromStr for NamedComparator {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(' ') {
            None => Self::new(s, SortDirection::Up),
            Some((name, "UP")) => Self::new(name, SortDirection::Up),
            Some((name, "DOWN")) => Self::new(name, SortDirection::Down),
            Some(_) => Err(ValueError::invalid("comparator", s)),
        }
    }
}

impl fmt::Display for NamedComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.direction == SortDirection::Down {
            f.write_str(" DOWN")?;
        }
        Ok(())
    }
}

/// The comparators applied to one column or row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortEntry {
    key: SortKey,
    comparators: Vec<NamedComparator>,
}

impl SortEntry {
    pub fn new(key: SortKey, comparators: Vec<NamedComparator>) -> Result<Self, ValueError> {
        if comparators.is_empty() {
            return Err(ValueError::Empty("comparator list"));
        }
        Ok(Self { key, comparators })
    }

    pub fn key(&self) -> SortKey {
        self.key
    }

    pub fn comparators(&self) -> &[NamedComparator] {
        &self.comparators
    }
}

impl FromStr for SortEntry {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, comparators) = s
            .split_once('=')
            .ok_or_else(|| ValueError::invalid("sort entry", s))?;
        let comparators = comparators
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<NamedComparator>, _>>()?;
        Self::new(key.parse()?, comparators)
    }
}

impl fmt::Display for SortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key)?;
        for (i, comparator) in self.comparators.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{comparator}")?;
        }
        Ok(())
    }
}

/// A non-empty list of [`SortEntry`] keyed by a single kind, each column or
/// row appearing once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortComparators(Vec<SortEntry>);

impl SortComparators {
    pub fn new(entries: Vec<SortEntry>) -> Result<Self, ValueError> {
        let Some(first) = entries.first() else {
            return Err(ValueError::Empty("sort comparators"));
        };
        let kind = first.key.kind();

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.key.kind() != kind {
                return Err(ValueError::invalid(
                    "sort comparators",
                    "columns and rows cannot be mixed",
                ));
            }
            if !seen.insert(entry.key) {
                return Err(ValueError::invalid(
                    "sort comparators",
                    format!("{} appears more than once", entry.key),
                ));
            }
        }
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.0
    }

    /// Whether the entries are keyed by columns or by rows.
    pub fn key_kind(&self) -> SelectionKind {
        self.0
            .first()
            .map_or(SelectionKind::Column, |entry| entry.key.kind())
    }
}

impl FromStr for SortComparators {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split(';')
            .map(str::parse)
            .collect::<Result<Vec<SortEntry>, _>>()?;
        Self::new(entries)
    }
}

impl fmt::Display for SortComparators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
