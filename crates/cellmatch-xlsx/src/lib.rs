//! # cellmatch-xlsx
//!
//! XLSX (Office Open XML) reader and writer for cellmatch.
//!
//! [`XlsxReader`] loads every sheet of a workbook as a header-plus-rows
//! table. [`XlsxWriter`] saves an annotated workbook, painting highlighted
//! cells with solid fills.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
