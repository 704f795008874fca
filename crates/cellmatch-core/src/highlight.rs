//! Per-cell highlight annotations

use std::collections::BTreeMap;
use std::fmt;

/// Highlight severity of a cell.
///
/// Variants are totally ordered `None < Generic < Numeric`; combining two
/// annotations of the same cell keeps the maximum, so a numeric match is
/// never downgraded by a later generic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Highlight {
    /// Value not present in the other sheet
    #[default]
    None,
    /// Value present in both sheets
    Generic,
    /// Value present in both sheets and parses as a number
    Numeric,
}

impl Highlight {
    /// Merge two annotations of the same cell
    pub fn merge(self, other: Highlight) -> Highlight {
        self.max(other)
    }

    /// Short lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Highlight::None => "none",
            Highlight::Generic => "generic",
            Highlight::Numeric => "numeric",
        }
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highlights for the data cells of one sheet.
///
/// Keys are `(row, col)` data-cell coordinates: row 0 is the first row
/// beneath the header. Unmarked cells are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetHighlights {
    cells: BTreeMap<(usize, usize), Highlight>,
}

impl SheetHighlights {
    /// Create an empty set of highlights
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a data cell, merging with any existing mark
    pub fn mark(&mut self, row: usize, col: usize, highlight: Highlight) {
        if highlight == Highlight::None {
            return;
        }
        let slot = self.cells.entry((row, col)).or_default();
        *slot = slot.merge(highlight);
    }

    /// Highlight of a data cell
    pub fn get(&self, row: usize, col: usize) -> Highlight {
        self.cells.get(&(row, col)).copied().unwrap_or_default()
    }

    /// Number of cells marked with exactly `highlight`
    pub fn count(&self, highlight: Highlight) -> usize {
        self.cells.values().filter(|h| **h == highlight).count()
    }

    /// Number of marked cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is marked
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_max() {
        use Highlight::*;
        for a in [None, Generic, Numeric] {
            for b in [None, Generic, Numeric] {
                assert_eq!(a.merge(b), b.merge(a));
                assert!(a.merge(b) >= a);
            }
        }
        assert_eq!(Numeric.merge(Generic), Numeric);
        assert_eq!(Generic.merge(None), Generic);
    }

    #[test]
    fn test_mark_never_downgrades() {
        let mut marks = SheetHighlights::new();
        marks.mark(0, 0, Highlight::Numeric);
        marks.mark(0, 0, Highlight::Generic);
        marks.mark(1, 0, Highlight::Generic);
        marks.mark(1, 0, Highlight::Generic);
        marks.mark(2, 0, Highlight::None);

        assert_eq!(marks.get(0, 0), Highlight::Numeric);
        assert_eq!(marks.get(1, 0), Highlight::Generic);
        assert_eq!(marks.get(2, 0), Highlight::None);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks.count(Highlight::Numeric), 1);
    }

    #[test]
    fn test_wide_columns_do_not_alias() {
        let mut marks = SheetHighlights::new();
        marks.mark(0, 1, Highlight::Generic);
        marks.mark(0, 65_537, Highlight::Numeric);

        assert_eq!(marks.get(0, 1), Highlight::Generic);
        assert_eq!(marks.get(0, 65_537), Highlight::Numeric);
        assert_eq!(marks.len(), 2);
    }
}
