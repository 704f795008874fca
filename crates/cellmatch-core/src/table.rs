//! Rectangular table with an explicit header row

use crate::cell::CellValue;

/// A rectangular grid of cells beneath a header row.
///
/// The header holds column names; data rows are 0-indexed beneath it. Every
/// row has exactly [`width`](Table::width) cells, padded with
/// [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    header: Vec<CellValue>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table with the given header and no data rows
    pub fn new<I, V>(header: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from a raw sheet grid whose first row is the header.
    ///
    /// Ragged rows are padded to the widest row.
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let mut table = Table {
            header: grid.next().unwrap_or_default(),
            rows: Vec::new(),
        };
        for row in grid {
            table.push_row(row);
        }
        table.pad_rows();
        table
    }

    /// Build a table column by column.
    ///
    /// ```
    /// use cellmatch_core::{CellValue, Table};
    ///
    /// let table = Table::from_columns(vec![
    ///     ("ID", vec![1.into(), 2.into()]),
    ///     ("City", vec!["NY".into(), "London".into()]),
    /// ]);
    /// assert_eq!(table.width(), 2);
    /// assert_eq!(table.row_count(), 2);
    /// assert_eq!(table.cell(1, 1), Some(&CellValue::from("London")));
    /// ```
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<CellValue>)>) -> Self {
        let height = columns.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        let mut rows = vec![Vec::with_capacity(columns.len()); height];
        let mut header = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            header.push(CellValue::String(name.into()));
            let mut values = values.into_iter();
            for row in rows.iter_mut() {
                row.push(values.next().unwrap_or_default());
            }
        }

        Self { header, rows }
    }

    /// Append a data row, widening the table if the row is wider
    pub fn push_row<I, V>(&mut self, row: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut row: Vec<CellValue> = row.into_iter().map(Into::into).collect();
        let width = self.width();
        if row.len() > width {
            self.header.resize(row.len(), CellValue::Empty);
            self.pad_rows();
        } else {
            row.resize(width, CellValue::Empty);
        }
        self.rows.push(row);
    }

    fn pad_rows(&mut self) {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.header.len());
        self.header.resize(width, CellValue::Empty);
        for row in &mut self.rows {
            row.resize(width, CellValue::Empty);
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header cells
    pub fn header(&self) -> &[CellValue] {
        &self.header
    }

    /// Replace a header cell, widening the table if needed
    pub fn set_header<V: Into<CellValue>>(&mut self, col: usize, value: V) {
        if col >= self.width() {
            self.header.resize(col + 1, CellValue::Empty);
            self.pad_rows();
        }
        self.header[col] = value.into();
    }

    /// Column names as display strings
    pub fn column_names(&self) -> Vec<String> {
        self.header.iter().map(ToString::to_string).collect()
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Value of the data cell at `(row, col)`
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over data cells that take part in comparison, as
    /// `(row, col, value)` in row-major order
    pub fn data_cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| !v.is_missing())
                .map(move |(c, v)| (r, c, v))
        })
    }

    /// Iterate over every sheet row: the header first, then the data rows
    pub fn sheet_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_grid_pads_ragged_rows() {
        let table = Table::from_grid(vec![
            vec!["A".into(), "B".into()],
            vec![1.into()],
            vec![1.into(), 2.into(), 3.into()],
        ]);

        assert_eq!(table.width(), 3);
        assert_eq!(table.header()[2], CellValue::Empty);
        assert_eq!(table.cell(0, 2), Some(&CellValue::Empty));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_from_grid_empty() {
        let table = Table::from_grid(Vec::new());
        assert_eq!(table.width(), 0);
        assert!(table.is_empty());
        assert_eq!(table.sheet_rows().count(), 1);
    }

    #[test]
    fn test_data_cells_skip_missing_and_header() {
        let mut table = Table::new(["Name", "Score"]);
        table.push_row(vec![CellValue::from("Ann"), CellValue::Empty]);
        table.push_row(vec![CellValue::Empty, CellValue::from(7)]);

        let cells: Vec<_> = table
            .data_cells()
            .map(|(r, c, v)| (r, c, v.to_string()))
            .collect();
        assert_eq!(
            cells,
            vec![(0, 0, "Ann".to_string()), (1, 1, "7".to_string())]
        );
    }

    #[test]
    fn test_set_header_widens() {
        let mut table = Table::new(["A"]);
        table.push_row(vec![CellValue::from(1)]);
        table.set_header(2, "C");

        assert_eq!(table.column_names(), vec!["A", "", "C"]);
        assert_eq!(table.cell(0, 2), Some(&CellValue::Empty));
    }

    #[test]
    fn test_from_columns_uneven_lengths() {
        let table = Table::from_columns(vec![
            ("ID", vec![1.into(), 2.into(), 3.into()]),
            ("Note", vec!["only".into()]),
        ]);
        assert_eq!(table.column_names(), vec!["ID", "Note"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(2, 1), Some(&CellValue::Empty));
    }
}
