//! # cellmatch
//!
//! Highlight the values two spreadsheets have in common.
//!
//! Every sheet of one workbook is compared with every sheet of the other by
//! cell *value*. Data cells whose value occurs in both are painted in the
//! output copies: red when the value is numeric, yellow otherwise. Header
//! rows are never painted.
//!
//! ## Features
//!
//! - Read XLSX workbooks and CSV files
//! - Write highlighted XLSX copies
//! - Configurable output directory, file suffix, colors and sheet pairing
//!
//! ## Example
//!
//! ```rust,no_run
//! use cellmatch::prelude::*;
//!
//! let report = compare_files(
//!     "file1.xlsx",
//!     "file2.xlsx",
//!     &CompareOptions::default(),
//!     &mut LogStatus,
//! )?;
//! println!("{} cells marked", report.left.total());
//! # Ok::<(), cellmatch::CompareError>(())
//! ```

pub mod compare;
pub mod error;
pub mod prelude;

pub use compare::{compare_files, CompareOptions, CompareReport, DEFAULT_OUTPUT_DIR, DEFAULT_SUFFIX};
pub use error::{CompareError, LoadError};

// Re-export core types
pub use cellmatch_core::{
    annotate, is_numeric_literal, sanitize_sheet_name, AnnotatedWorkbook, Annotation,
    AnnotationSummary, Annotator, CellAddress, CellError, CellValue, Color, Error, FillStyle,
    Highlight, HighlightPalette, LogStatus, MatchSet, NullStatus, Result, Sheet, SheetHighlights,
    SheetPairing, StatusLog, StatusSink, Table, ValueUniverse, Workbook, MAX_COLS, MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use cellmatch_csv::{CsvError, CsvReadOptions, CsvReader};
pub use cellmatch_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Open a workbook from a file, choosing the format by extension
    fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LoadError> {
        Self::open_with(path, &CsvReadOptions::default())
    }

    /// Open a workbook, parsing CSV files with `csv`
    fn open_with<P: AsRef<Path>>(
        path: P,
        csv: &CsvReadOptions,
    ) -> std::result::Result<Self, LoadError>;

    /// Save the workbook as XLSX without highlights
    fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), XlsxError>;
}

impl WorkbookExt for Workbook {
    fn open_with<P: AsRef<Path>>(
        path: P,
        csv: &CsvReadOptions,
    ) -> std::result::Result<Workbook, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(XlsxReader::read_file(path)?),
            Some("csv") => Ok(CsvReader::read_file(path, csv)?),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), XlsxError> {
        XlsxWriter::write_workbook_file(self, path)
    }
}
