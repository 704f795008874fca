//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use cellmatch_core::{sanitize_sheet_name, CellAddress, CellValue, Table, Workbook};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a one-sheet workbook named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| sanitize_sheet_name(&stem.to_string_lossy()))
            .unwrap_or_else(|| sanitize_sheet_name(""));

        let file = File::open(path)?;
        let table = Self::read_table(file, options)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.row_count(),
            cols = table.width(),
            "loaded csv"
        );
        Ok(Workbook::new().with_sheet(&name, table)?)
    }

    /// Read CSV from a reader into a one-sheet workbook named `Sheet1`
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let table = Self::read_table(reader, options)?;
        Ok(Workbook::new().with_sheet("Sheet1", table)?)
    }

    /// Read CSV from a reader into a table.
    ///
    /// Without a header record, columns are named `A`, `B`, ... like sheet
    /// columns.
    pub fn read_table<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<CellValue> = if options.has_header {
            csv_reader.headers()?.iter().map(CellValue::from).collect()
        } else {
            Vec::new()
        };

        let mut table = Table::new(header);
        for result in csv_reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if options.auto_detect_types {
                        Self::detect_type(field)
                    } else if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::string(field)
                    }
                })
                .collect();
            table.push_row(row);
        }

        if !options.has_header {
            for col in 0..table.width() {
                let name = CellAddress::column_to_letters(col as u16);
                table.set_header(col, name);
            }
        }

        Ok(table)
    }

    /// Detect the type of a field value.
    ///
    /// Text that is neither a finite number nor a boolean keeps its exact
    /// spelling, surrounding whitespace included.
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::string(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_type() {
        assert_eq!(CsvReader::detect_type("100"), CellValue::Number(100.0));
        assert_eq!(CsvReader::detect_type(" 2.5 "), CellValue::Number(2.5));
        assert_eq!(CsvReader::detect_type("TRUE"), CellValue::Boolean(true));
        assert_eq!(CsvReader::detect_type("false"), CellValue::Boolean(false));
        assert_eq!(CsvReader::detect_type("1"), CellValue::Number(1.0));
        assert_eq!(CsvReader::detect_type(""), CellValue::Empty);
        assert_eq!(CsvReader::detect_type("inf"), CellValue::from("inf"));
        assert_eq!(CsvReader::detect_type(" Paris"), CellValue::from(" Paris"));
    }

    #[test]
    fn test_read_with_header() {
        let data = "ID,City,Value\n1,NY,100\n2,London,200\n3,,\n";
        let wb = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        let table = wb.table("Sheet1").unwrap();
        assert_eq!(table.column_names(), vec!["ID", "City", "Value"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(1, 1), Some(&CellValue::from("London")));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Number(200.0)));
        assert_eq!(table.cell(2, 1), Some(&CellValue::Empty));
    }

    #[test]
    fn test_read_ragged_rows() {
        let data = "a,b\n1\n2,3,4\n";
        let wb = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        let table = wb.table("Sheet1").unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Empty));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Number(4.0)));
    }

    #[test]
    fn test_read_without_header_or_types() {
        let options = CsvReadOptions::default()
            .with_delimiter(b';')
            .with_header(false)
            .with_type_detection(false);
        let wb = CsvReader::read("x;1\ny;2\n".as_bytes(), &options).unwrap();

        let table = wb.table("Sheet1").unwrap();
        assert_eq!(table.column_names(), vec!["A", "B"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 1), Some(&CellValue::from("1")));
    }
}
