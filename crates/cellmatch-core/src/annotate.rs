//! Value-intersection annotator
//!
//! Compares two workbooks by cell *value* rather than position. For every
//! sheet pair the distinct values of both sheets are intersected; every data
//! cell whose value lies in the intersection is marked, as
//! [`Highlight::Numeric`] when the value parses as a finite number and
//! [`Highlight::Generic`] otherwise. Marks from different sheet pairs merge
//! by taking the maximum, so the result does not depend on pair order.
//!
//! ```
//! use cellmatch_core::{annotate, Highlight, Table, Workbook};
//!
//! let left = Workbook::new()
//!     .with_sheet("A", Table::from_columns(vec![("City", vec!["Paris".into()])]))
//!     .unwrap();
//! let right = Workbook::new()
//!     .with_sheet("B", Table::from_columns(vec![("Town", vec!["Paris".into()])]))
//!     .unwrap();
//!
//! let (left, right) = annotate(&left, &right);
//! assert_eq!(left.highlight_at("A", 0, 0), Highlight::Generic);
//! assert_eq!(right.highlight_at("B", 0, 0), Highlight::Generic);
//! ```

use ahash::AHashSet;

use crate::highlight::{Highlight, SheetHighlights};
use crate::table::Table;
use crate::workbook::Workbook;

/// Distinct normalized values of a table's data cells
#[derive(Debug, Clone, Default)]
pub struct ValueUniverse {
    values: AHashSet<String>,
}

impl ValueUniverse {
    /// Collect the universe of a table. Missing cells and the header row are
    /// excluded.
    pub fn of(table: &Table) -> Self {
        let values = table
            .data_cells()
            .filter_map(|(_, _, v)| v.normalized())
            .collect();
        Self { values }
    }

    /// Whether the universe contains `value`
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table had no comparable values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

/// Values shared by both sheets of a sheet pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    all: AHashSet<String>,
    numeric: AHashSet<String>,
}

impl MatchSet {
    /// Intersect two universes. The result does not depend on argument order.
    pub fn between(a: &ValueUniverse, b: &ValueUniverse) -> Self {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

        let all: AHashSet<String> = small
            .values
            .iter()
            .filter(|v| large.contains(v.as_str()))
            .cloned()
            .collect();
        let numeric = all
            .iter()
            .filter(|v| is_numeric_literal(v.as_str()))
            .cloned()
            .collect();

        Self { all, numeric }
    }

    /// Highlight for a cell holding the normalized `value`
    pub fn classify(&self, value: &str) -> Highlight {
        if self.numeric.contains(value) {
            Highlight::Numeric
        } else if self.contains(value) {
            Highlight::Generic
        } else {
            Highlight::None
        }
    }

    /// Whether `value` is shared
    pub fn contains(&self, value: &str) -> bool {
        self.all.contains(value)
    }

    /// Whether the two sheets share no value
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Number of shared values
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Number of shared values that parse as numbers
    pub fn numeric_len(&self) -> usize {
        self.numeric.len()
    }
}

/// Whether `value` parses as a finite decimal number.
///
/// Surrounding whitespace is tolerated. Non-numeric text is simply not
/// numeric; it is never an error.
pub fn is_numeric_literal(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

/// Which sheets of the two workbooks are compared with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetPairing {
    /// Every left sheet against every right sheet
    #[default]
    CrossProduct,
    /// Only sheets with the same name
    ByName,
}

/// Highlight counts for one workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationSummary {
    /// Cells marked [`Highlight::Generic`]
    pub generic: usize,
    /// Cells marked [`Highlight::Numeric`]
    pub numeric: usize,
}

impl AnnotationSummary {
    /// Total number of marked cells
    pub fn total(&self) -> usize {
        self.generic + self.numeric
    }
}

/// A workbook together with the highlights of its data cells
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedWorkbook {
    workbook: Workbook,
    highlights: Vec<SheetHighlights>,
}

impl AnnotatedWorkbook {
    /// Wrap a workbook with no highlights
    pub fn unmarked(workbook: Workbook) -> Self {
        let highlights = vec![SheetHighlights::new(); workbook.sheet_count()];
        Self {
            workbook,
            highlights,
        }
    }

    /// The annotated workbook's contents, identical to the input
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Highlights of the sheet at `index`
    pub fn highlights(&self, index: usize) -> Option<&SheetHighlights> {
        self.highlights.get(index)
    }

    /// Highlights of the sheet named `name`
    pub fn sheet_highlights(&self, name: &str) -> Option<&SheetHighlights> {
        self.workbook
            .sheet_index(name)
            .and_then(|i| self.highlights.get(i))
    }

    /// Highlight of a data cell (row 0 is the first row below the header)
    pub fn highlight_at(&self, sheet: &str, row: usize, col: usize) -> Highlight {
        self.sheet_highlights(sheet)
            .map(|h| h.get(row, col))
            .unwrap_or_default()
    }

    /// Mark a data cell of the sheet at `index`, merging with any earlier mark
    pub fn mark(&mut self, index: usize, row: usize, col: usize, highlight: Highlight) {
        if let Some(sheet) = self.highlights.get_mut(index) {
            sheet.mark(row, col, highlight);
        }
    }

    /// Count marked cells
    pub fn summary(&self) -> AnnotationSummary {
        self.highlights
            .iter()
            .fold(AnnotationSummary::default(), |acc, h| AnnotationSummary {
                generic: acc.generic + h.count(Highlight::Generic),
                numeric: acc.numeric + h.count(Highlight::Numeric),
            })
    }
}

/// Outcome of annotating two workbooks
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Annotated copy of the left workbook
    pub left: AnnotatedWorkbook,
    /// Annotated copy of the right workbook
    pub right: AnnotatedWorkbook,
    /// Number of sheet pairs compared
    pub sheet_pairs: usize,
    /// Number of sheet pairs that shared at least one value
    pub matched_pairs: usize,
}

impl Annotation {
    /// Discard the pair statistics
    pub fn into_pair(self) -> (AnnotatedWorkbook, AnnotatedWorkbook) {
        (self.left, self.right)
    }
}

/// Runs value-intersection matching over sheet pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotator {
    pairing: SheetPairing,
}

impl Annotator {
    /// Annotator comparing the full sheet cross-product
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotator using the given sheet pairing
    pub fn with_pairing(pairing: SheetPairing) -> Self {
        Self { pairing }
    }

    /// Sheet pairing in use
    pub fn pairing(&self) -> SheetPairing {
        self.pairing
    }

    /// Annotate fresh copies of both workbooks
    pub fn annotate(&self, left: &Workbook, right: &Workbook) -> Annotation {
        let left_universes: Vec<ValueUniverse> = left
            .sheets()
            .map(|s| ValueUniverse::of(s.table()))
            .collect();
        let right_universes: Vec<ValueUniverse> = right
            .sheets()
            .map(|s| ValueUniverse::of(s.table()))
            .collect();

        let mut out = Annotation {
            left: AnnotatedWorkbook::unmarked(left.clone()),
            right: AnnotatedWorkbook::unmarked(right.clone()),
            sheet_pairs: 0,
            matched_pairs: 0,
        };

        for (li, left_sheet) in left.sheets().enumerate() {
            for (ri, right_sheet) in right.sheets().enumerate() {
                if self.pairing == SheetPairing::ByName && left_sheet.name() != right_sheet.name()
                {
                    continue;
                }
                out.sheet_pairs += 1;

                let matches = MatchSet::between(&left_universes[li], &right_universes[ri]);
                tracing::debug!(
                    left = left_sheet.name(),
                    right = right_sheet.name(),
                    shared = matches.len(),
                    numeric = matches.numeric_len(),
                    "compared sheet pair"
                );
                if matches.is_empty() {
                    continue;
                }
                out.matched_pairs += 1;

                mark_table(&mut out.left, li, left_sheet.table(), &matches);
                mark_table(&mut out.right, ri, right_sheet.table(), &matches);
            }
        }

        out
    }
}

fn mark_table(target: &mut AnnotatedWorkbook, index: usize, table: &Table, matches: &MatchSet) {
    for (row, col, value) in table.data_cells() {
        if let Some(value) = value.normalized() {
            target.mark(index, row, col, matches.classify(&value));
        }
    }
}

/// Annotate both workbooks over the full sheet cross-product
pub fn annotate(left: &Workbook, right: &Workbook) -> (AnnotatedWorkbook, AnnotatedWorkbook) {
    Annotator::new().annotate(left, right).into_pair()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use pretty_assertions::assert_eq;

    fn universe(values: &[&str]) -> ValueUniverse {
        let mut table = Table::new(["v"]);
        for v in values {
            table.push_row([*v]);
        }
        ValueUniverse::of(&table)
    }

    #[test]
    fn test_universe_excludes_header_and_missing() {
        let mut table = Table::new(["Name", "Name"]);
        table.push_row(vec![CellValue::from("Ann"), CellValue::Empty]);
        table.push_row(vec![CellValue::from("Ann"), CellValue::from(3.0)]);

        let u = ValueUniverse::of(&table);
        let mut values: Vec<_> = u.iter().collect();
        values.sort();
        assert_eq!(values, vec!["3", "Ann"]);
        assert!(!u.contains("Name"));
    }

    #[test]
    fn test_match_set_classify() {
        let m = MatchSet::between(&universe(&["100", "Paris", "x"]), &universe(&["100", "Paris"]));
        assert_eq!(m.len(), 2);
        assert_eq!(m.numeric_len(), 1);
        assert_eq!(m.classify("100"), Highlight::Numeric);
        assert_eq!(m.classify("Paris"), Highlight::Generic);
        assert_eq!(m.classify("x"), Highlight::None);
        assert!(m.contains("Paris"));
        assert!(!m.contains("x"));
    }

    #[test]
    fn test_match_set_is_symmetric() {
        let a = universe(&["1", "2", "b", "c"]);
        let b = universe(&["2", "c", "d"]);
        assert_eq!(MatchSet::between(&a, &b), MatchSet::between(&b, &a));
    }

    #[test]
    fn test_is_numeric_literal() {
        for yes in ["100", "-3.5", " 42 ", "1e3", ".5", "+7"] {
            assert!(is_numeric_literal(yes), "{yes:?} should be numeric");
        }
        for no in ["", "abc", "12abc", "inf", "NaN", "1,000", "TRUE"] {
            assert!(!is_numeric_literal(no), "{no:?} should not be numeric");
        }
    }

    #[test]
    fn test_empty_intersection_touches_nothing() {
        let left = Workbook::new()
            .with_sheet("L", Table::from_columns(vec![("a", vec!["x".into(), 1.into()])]))
            .unwrap();
        let right = Workbook::new()
            .with_sheet("R", Table::from_columns(vec![("a", vec!["y".into(), 2.into()])]))
            .unwrap();

        let result = Annotator::new().annotate(&left, &right);
        assert_eq!(result.sheet_pairs, 1);
        assert_eq!(result.matched_pairs, 0);
        assert_eq!(result.left.summary().total(), 0);
        assert_eq!(result.right.summary().total(), 0);
        assert_eq!(result.left.workbook(), &left);
    }

    #[test]
    fn test_by_name_pairing_skips_other_sheets() {
        let table = || Table::from_columns(vec![("a", vec!["shared".into()])]);
        let left = Workbook::new().with_sheet("One", table()).unwrap();
        let right = Workbook::new().with_sheet("Two", table()).unwrap();

        let cross = Annotator::new().annotate(&left, &right);
        assert_eq!(cross.left.highlight_at("One", 0, 0), Highlight::Generic);

        let by_name = Annotator::with_pairing(SheetPairing::ByName).annotate(&left, &right);
        assert_eq!(by_name.sheet_pairs, 0);
        assert_eq!(by_name.left.highlight_at("One", 0, 0), Highlight::None);
    }
}
