//! Pagination parameters shared by every list-style token.

use std::fmt;

/// An optional offset and an optional count.
///
/// An offset of zero is the same as no offset and is normalized away, so
/// `/offset/0` and no segment at all describe the same value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetAndCount {
    offset: Option<u32>,
    count: Option<u32>,
}

impl OffsetAndCount {
    /// Neither offset nor count.
    pub const EMPTY: Self = Self {
        offset: None,
        count: None,
    };

    pub fn new(offset: Option<u32>, count: Option<u32>) -> Self {
        Self {
            offset: offset.filter(|offset| *offset > 0),
            count,
        }
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Returns a copy with a different offset.
    pub fn with_offset(self, offset: Option<u32>) -> Self {
        Self::new(offset, self.count)
    }

    /// Returns a copy with a different count.
    pub fn with_count(self, count: Option<u32>) -> Self {
        Self::new(self.offset, count)
    }
}

/// Renders `/offset/<n>/count/<n>`, omitting absent parts.
impl fmt::Display for OffsetAndCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset {
            write!(f, "/offset/{offset}")?;
        }
        if let Some(count) = self.count {
            write!(f, "/count/{count}")?;
        }
        Ok(())
    }
}
