//! # cellmatch-csv
//!
//! CSV reader for cellmatch. A CSV file loads as a workbook with a single
//! sheet.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
