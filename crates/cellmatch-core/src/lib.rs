//! # cellmatch-core
//!
//! Core data structures and the value-intersection annotator for cellmatch.
//!
//! This crate provides:
//! - [`CellValue`] and [`CellAddress`] - cell contents and locations
//! - [`Table`] and [`Workbook`] - header-plus-rows tables keyed by sheet name
//! - [`Annotator`] - marks cells whose values appear in the other workbook
//! - [`StatusSink`] - progress message channel
//!
//! ## Example
//!
//! ```rust
//! use cellmatch_core::{Annotator, Highlight, Table, Workbook};
//!
//! let left = Workbook::new()
//!     .with_sheet("Sheet1", Table::from_columns(vec![("Value", vec![100.into(), 200.into()])]))
//!     .unwrap();
//! let right = Workbook::new()
//!     .with_sheet("Sheet1", Table::from_columns(vec![("Value", vec![100.into(), 250.into()])]))
//!     .unwrap();
//!
//! let result = Annotator::new().annotate(&left, &right);
//! assert_eq!(result.left.highlight_at("Sheet1", 0, 0), Highlight::Numeric);
//! assert_eq!(result.left.highlight_at("Sheet1", 1, 0), Highlight::None);
//! ```

pub mod annotate;
pub mod cell;
pub mod error;
pub mod highlight;
pub mod status;
pub mod style;
pub mod table;
pub mod workbook;

// Re-exports for convenience
pub use annotate::{
    annotate, is_numeric_literal, AnnotatedWorkbook, Annotation, AnnotationSummary, Annotator,
    MatchSet, SheetPairing, ValueUniverse,
};
pub use cell::{CellAddress, CellError, CellValue, DateSystem};
pub use error::{Error, Result};
pub use highlight::{Highlight, SheetHighlights};
pub use status::{LogStatus, NullStatus, StatusLog, StatusSink};
pub use style::{Color, FillStyle, HighlightPalette};
pub use table::Table;
pub use workbook::{sanitize_sheet_name, Sheet, Workbook};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
