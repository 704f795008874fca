//! Facade error types

use std::path::PathBuf;

use thiserror::Error;

use cellmatch_csv::CsvError;
use cellmatch_xlsx::XlsxError;

/// Errors raised while opening a spreadsheet
#[derive(Debug, Error)]
pub enum LoadError {
    /// XLSX parse or I/O failure
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// CSV parse or I/O failure
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// Extension not recognised
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Errors that abort a comparison run
#[derive(Debug, Error)]
pub enum CompareError {
    /// An input path does not exist
    #[error("File not found at {}", path.display())]
    MissingInput { path: PathBuf },

    /// An input exists but could not be read as a spreadsheet
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// The output directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A highlighted workbook could not be saved
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}
