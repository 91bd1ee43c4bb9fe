//! Selections and anchors.
//!
//! A [`Selection`] is what the user has highlighted: a cell, a column, a row,
//! a range of any of those, or a label that names one of them. An
//! [`AnchoredSelection`] pairs it with the [`Anchor`] that stays fixed when a
//! range is extended.

use std::{fmt, str::FromStr};

use crate::{
    error::{HistoryTokenError, ValueError},
    reference::{CellRange, CellRef, ColumnRange, ColumnRef, LabelName, RowRange, RowRef},
};

/// Something the user can select.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Cell(CellRef),
    CellRange(CellRange),
    Column(ColumnRef),
    ColumnRange(ColumnRange),
    Row(RowRef),
    RowRange(RowRange),
    Label(LabelName),
}

/// The family a [`Selection`] belongs to, which decides the token it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    /// Cells, cell ranges and labels.
    Cell,
    Column,
    Row,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cell => "cell",
            Self::Column => "column",
            Self::Row => "row",
        })
    }
}

impl Selection {
    /// Parses text found after `/cell/`: a cell, a cell range, `*` or a label.
    pub fn parse_cell(text: &str) -> Result<Self, ValueError> {
        if let Ok(range) = text.parse::<CellRange>() {
            return Ok(Self::from(range));
        }
        LabelName::new(text)
            .map(Self::Label)
            .map_err(|_| ValueError::InvalidCell(text.to_string()))
    }

    /// Parses text found after `/column/`.
    pub fn parse_column(text: &str) -> Result<Self, ValueError> {
        text.parse::<ColumnRange>().map(Self::from)
    }

    /// Parses text found after `/row/`.
    pub fn parse_row(text: &str) -> Result<Self, ValueError> {
        text.parse::<RowRange>().map(Self::from)
    }

    /// Parses text of any kind, trying cells, then columns, then rows.
    pub fn parse_any(text: &str) -> Result<Self, ValueError> {
        Self::parse_cell(text)
            .or_else(|_| Self::parse_column(text))
            .or_else(|_| Self::parse_row(text))
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Self::Cell(_) | Self::CellRange(_) | Self::Label(_) => SelectionKind::Cell,
            Self::Column(_) | Self::ColumnRange(_) => SelectionKind::Column,
            Self::Row(_) | Self::RowRange(_) => SelectionKind::Row,
        }
    }

    /// Returns true for the range variants.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Self::CellRange(_) | Self::ColumnRange(_) | Self::RowRange(_)
        )
    }

    /// The anchor a freshly created selection of this shape receives.
    pub fn default_anchor(&self) -> Anchor {
        match self {
            Self::CellRange(_) => Anchor::BottomRight,
            Self::ColumnRange(_) => Anchor::Right,
            Self::RowRange(_) => Anchor::Bottom,
            _ => Anchor::None,
        }
    }

    /// The anchors this selection may carry.
    pub fn is_anchor_allowed(&self, anchor: Anchor) -> bool {
        match self {
            Self::CellRange(_) => matches!(
                anchor,
                Anchor::TopLeft | Anchor::TopRight | Anchor::BottomLeft | Anchor::BottomRight
            ),
            Self::ColumnRange(_) => matches!(anchor, Anchor::Left | Anchor::Right),
            Self::RowRange(_) => matches!(anchor, Anchor::Top | Anchor::Bottom),
            _ => anchor == Anchor::None,
        }
    }

    /// Returns true when the selection begins at the top or left edge of the
    /// sheet, which is required before it can be frozen.
    pub fn is_freezable(&self) -> bool {
        match self {
            Self::Cell(cell) => *cell == CellRef::home(),
            Self::CellRange(range) => range.begin() == CellRef::home(),
            Self::Column(column) => column.index() == 0,
            Self::ColumnRange(range) => range.begin().index() == 0,
            Self::Row(row) => row.index() == 0,
            Self::RowRange(range) => range.begin().index() == 0,
            Self::Label(_) => false,
        }
    }

    /// Returns true when `other` lies within (or equals) this selection.
    pub fn contains(&self, other: &Selection) -> bool {
        match (self, other) {
            (Self::Cell(a), Self::Cell(b)) => a == b,
            (Self::CellRange(range), Self::Cell(cell)) => range.contains(*cell),
            (Self::CellRange(a), Self::CellRange(b)) => a.contains_range(*b),
            (Self::Column(column), Self::Cell(cell)) => cell.column() == *column,
            (Self::Column(a), Self::Column(b)) => a == b,
            (Self::Column(column), Self::CellRange(range)) => {
                range.begin().column() == *column && range.end().column() == *column
            }
            (Self::ColumnRange(range), Self::Cell(cell)) => range.contains(cell.column()),
            (Self::ColumnRange(range), Self::CellRange(cells)) => {
                range.contains(cells.begin().column()) && range.contains(cells.end().column())
            }
            (Self::ColumnRange(range), Self::Column(column)) => range.contains(*column),
            (Self::ColumnRange(a), Self::ColumnRange(b)) => {
                a.contains(b.begin()) && a.contains(b.end())
            }
            (Self::Row(row), Self::Cell(cell)) => cell.row() == *row,
            (Self::Row(a), Self::Row(b)) => a == b,
            (Self::Row(row), Self::CellRange(range)) => {
                range.begin().row() == *row && range.end().row() == *row
            }
            (Self::RowRange(range), Self::Cell(cell)) => range.contains(cell.row()),
            (Self::RowRange(range), Self::CellRange(cells)) => {
                range.contains(cells.begin().row()) && range.contains(cells.end().row())
            }
            (Self::RowRange(range), Self::Row(row)) => range.contains(*row),
            (Self::RowRange(a), Self::RowRange(b)) => a.contains(b.begin()) && a.contains(b.end()),
            (Self::Label(a), Self::Label(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CellRange> for Selection {
    fn from(range: CellRange) -> Self {
        if range.is_single() {
            Self::Cell(range.begin())
        } else {
            Self::CellRange(range)
        }
    }
}

impl From<ColumnRange> for Selection {
    fn from(range: ColumnRange) -> Self {
        if range.is_single() {
            Self::Column(range.begin())
        } else {
            Self::ColumnRange(range)
        }
    }
}

impl From<RowRange> for Selection {
    fn from(range: RowRange) -> Self {
        if range.is_single() {
            Self::Row(range.begin())
        } else {
            Self::RowRange(range)
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => write!(f, "{cell}"),
            Self::CellRange(range) => write!(f, "{range}"),
            Self::Column(column) => write!(f, "{column}"),
            Self::ColumnRange(range) => write!(f, "{range}"),
            Self::Row(row) => write!(f, "{row}"),
            Self::RowRange(range) => write!(f, "{range}"),
            Self::Label(label) => write!(f, "{label}"),
        }
    }
}

/// The fixed corner or edge of a range selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
}

impl Anchor {
    /// The keyword used in fragments. [`Anchor::None`] is never rendered.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for Anchor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ValueError::InvalidAnchor(s.to_string())),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`Selection`] with its [`Anchor`].
///
/// Single cells, columns, rows and labels always carry [`Anchor::None`];
/// ranges always carry one of their directional anchors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchoredSelection {
    selection: Selection,
    anchor: Anchor,
}

impl AnchoredSelection {
    /// Anchors `selection`.
    ///
    /// Non-range selections ignore `anchor`. Ranges given [`Anchor::None`]
    /// receive their default anchor.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryTokenError::InvalidArgument`] if a range is given a
    /// directional anchor it cannot carry, e.g. `top` for a column range.
    pub fn new(selection: Selection, anchor: Anchor) -> Result<Self, HistoryTokenError> {
        let anchor = if !selection.is_range() {
            Anchor::None
        } else if anchor == Anchor::None {
            selection.default_anchor()
        } else if selection.is_anchor_allowed(anchor) {
            anchor
        } else {
            return Err(HistoryTokenError::invalid_argument(format!(
                "anchor `{anchor}` is not valid for selection `{selection}`"
            )));
        };
        Ok(Self { selection, anchor })
    }

    /// Anchors `selection` with its default anchor.
    pub fn with_default_anchor(selection: Selection) -> Self {
        let anchor = selection.default_anchor();
        Self { selection, anchor }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn kind(&self) -> SelectionKind {
        self.selection.kind()
    }

    /// Returns a copy with a different anchor.
    ///
    /// # Errors
    ///
    /// See [`AnchoredSelection::new`].
    pub fn with_anchor(&self, anchor: Anchor) -> Result<Self, HistoryTokenError> {
        Self::new(self.selection.clone(), anchor)
    }
}

impl From<Selection> for AnchoredSelection {
    fn from(selection: Selection) -> Self {
        Self::with_default_anchor(selection)
    }
}

impl fmt::Display for AnchoredSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selection)?;
        if self.anchor != Anchor::None {
            write!(f, "/{}", self.anchor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> Selection {
        Selection::parse_cell(text).expect("valid cell selection")
    }

    #[test]
    fn test_parse_cell_context() {
        assert!(matches!(cell("A1"), Selection::Cell(_)));
        assert!(matches!(cell("B2:C3"), Selection::CellRange(_)));
        assert!(matches!(cell("B2:B2"), Selection::Cell(_)));
        assert!(matches!(cell("Label123"), Selection::Label(_)));
        assert!(matches!(cell("*"), Selection::CellRange(_)));
        assert!(Selection::parse_cell("!invalid").is_err());
    }

    #[test]
    fn test_parse_column_and_row_context() {
        assert!(matches!(
            Selection::parse_column("A:B").unwrap(),
            Selection::ColumnRange(_)
        ));
        assert!(matches!(
            Selection::parse_column("C").unwrap(),
            Selection::Column(_)
        ));
        assert!(Selection::parse_column("A1").is_err());
        assert!(matches!(
            Selection::parse_row("3:5").unwrap(),
            Selection::RowRange(_)
        ));
        assert!(Selection::parse_row("A").is_err());
    }

    #[test]
    fn test_single_selection_normalizes_anchor() {
        let anchored = AnchoredSelection::new(cell("A1"), Anchor::TopLeft).unwrap();
        assert_eq!(anchored.anchor(), Anchor::None);

        let label = AnchoredSelection::new(cell("Label1"), Anchor::Right).unwrap();
        assert_eq!(label.anchor(), Anchor::None);
    }

    #[test]
    fn test_range_anchor_validation() {
        let range = cell("B2:C3");
        assert_eq!(
            AnchoredSelection::new(range.clone(), Anchor::None)
                .unwrap()
                .anchor(),
            Anchor::BottomRight
        );
        assert_eq!(
            AnchoredSelection::new(range.clone(), Anchor::TopLeft)
                .unwrap()
                .anchor(),
            Anchor::TopLeft
        );
        assert!(matches!(
            AnchoredSelection::new(range, Anchor::Left),
            Err(HistoryTokenError::InvalidArgument(_))
        ));

        let columns = Selection::parse_column("A:B").unwrap();
        assert!(AnchoredSelection::new(columns.clone(), Anchor::Left).is_ok());
        assert!(AnchoredSelection::new(columns, Anchor::Top).is_err());
    }

    #[test]
    fn test_contains() {
        assert!(cell("B2:C3").contains(&cell("C3")));
        assert!(!cell("B2:C3").contains(&cell("D4")));
        assert!(cell("A1").contains(&cell("A1")));

        let column = Selection::parse_column("B").unwrap();
        assert!(column.contains(&cell("B7")));
        assert!(!column.contains(&cell("C7")));

        let rows = Selection::parse_row("2:4").unwrap();
        assert!(rows.contains(&Selection::parse_row("3").unwrap()));
        assert!(rows.contains(&cell("Z3")));
        assert!(!rows.contains(&cell("Z5")));
    }

    #[test]
    fn test_freezable() {
        assert!(cell("A1").is_freezable());
        assert!(cell("A1:B2").is_freezable());
        assert!(!cell("B2:C3").is_freezable());
        assert!(Selection::parse_column("A:B").unwrap().is_freezable());
        assert!(!Selection::parse_column("B:C").unwrap().is_freezable());
        assert!(Selection::parse_row("1:3").unwrap().is_freezable());
        assert!(!cell("Label1").is_freezable());
    }

    #[test]
    fn test_anchored_display() {
        let anchored = AnchoredSelection::new(cell("B2:C3"), Anchor::TopLeft).unwrap();
        assert_eq!(anchored.to_string(), "B2:C3/top-left");
        assert_eq!(AnchoredSelection::from(cell("A1")).to_string(), "A1");
    }
}
