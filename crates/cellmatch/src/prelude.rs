//! Prelude module - common imports for cellmatch users
//!
//! ```rust
//! use cellmatch::prelude::*;
//! ```

pub use crate::{
    // Comparison pipeline
    compare_files,
    CellValue,
    Color,
    CompareError,
    CompareOptions,
    CompareReport,
    CsvReadOptions,
    Highlight,
    HighlightPalette,
    LogStatus,
    SheetPairing,
    // Status channel
    StatusLog,
    StatusSink,
    Table,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    XlsxReader,
    XlsxWriter,
};
