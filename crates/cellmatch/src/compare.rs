//! Two-file comparison pipeline
//!
//! [`compare_files`] loads two spreadsheets, annotates the values they share
//! and writes a highlighted XLSX copy of each, reporting progress through a
//! [`StatusSink`].

use std::path::{Path, PathBuf};

use cellmatch_core::{
    AnnotatedWorkbook, AnnotationSummary, Annotator, HighlightPalette, SheetPairing, StatusSink,
    Workbook,
};
use cellmatch_csv::CsvReadOptions;
use cellmatch_xlsx::XlsxWriter;

use crate::error::CompareError;
use crate::WorkbookExt;

/// Default directory for highlighted copies
pub const DEFAULT_OUTPUT_DIR: &str = "highlighted_excel_files";

/// Default file-name suffix of highlighted copies
pub const DEFAULT_SUFFIX: &str = "_highlighted";

/// Options for a comparison run
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// Directory receiving the highlighted copies, created if absent
    pub output_dir: PathBuf,
    /// Appended to each input's file stem
    pub suffix: String,
    /// Fill colors for numeric and generic matches
    pub palette: HighlightPalette,
    /// Which sheets are compared with each other
    pub pairing: SheetPairing,
    /// How CSV inputs are parsed
    pub csv: CsvReadOptions,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            suffix: DEFAULT_SUFFIX.to_string(),
            palette: HighlightPalette::default(),
            pairing: SheetPairing::default(),
            csv: CsvReadOptions::default(),
        }
    }
}

impl CompareOptions {
    /// Write highlighted copies into `dir`
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Use a different file-name suffix
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Use different highlight colors
    pub fn with_palette(mut self, palette: HighlightPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Use a different sheet pairing
    pub fn with_pairing(mut self, pairing: SheetPairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Parse CSV inputs with `csv`
    pub fn with_csv_options(mut self, csv: CsvReadOptions) -> Self {
        self.csv = csv;
        self
    }

    /// Output paths for the two inputs.
    ///
    /// Inputs sharing a file stem would collide, so the right-hand copy then
    /// gets an extra `_2`.
    pub fn output_paths(&self, left: &Path, right: &Path) -> (PathBuf, PathBuf) {
        let left_out = self.output_path(left, "");
        let mut right_out = self.output_path(right, "");
        if right_out == left_out {
            right_out = self.output_path(right, "_2");
        }
        (left_out, right_out)
    }

    fn output_path(&self, input: &Path, disambiguator: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string());
        self.output_dir
            .join(format!("{}{}{}.xlsx", stem, self.suffix, disambiguator))
    }
}

/// Outcome of a successful comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareReport {
    /// Highlighted copy of the left input
    pub left_output: PathBuf,
    /// Highlighted copy of the right input
    pub right_output: PathBuf,
    /// Marked cells in the left copy
    pub left: AnnotationSummary,
    /// Marked cells in the right copy
    pub right: AnnotationSummary,
    /// Sheet pairs compared
    pub sheet_pairs: usize,
    /// Sheet pairs sharing at least one value
    pub matched_pairs: usize,
}

/// Compare two spreadsheet files and write highlighted copies of both.
///
/// Progress goes to `status`. A fatal error is reported there as
/// `Error: <description>` before it is returned. Missing inputs are detected
/// before the output directory is created.
pub fn compare_files<L, R>(
    left: L,
    right: R,
    options: &CompareOptions,
    status: &mut dyn StatusSink,
) -> Result<CompareReport, CompareError>
where
    L: AsRef<Path>,
    R: AsRef<Path>,
{
    let result = run(left.as_ref(), right.as_ref(), options, status);
    if let Err(err) = &result {
        tracing::warn!(error = %err, "comparison failed");
        status.status(&format!("Error: {}", err));
    }
    result
}

fn run(
    left: &Path,
    right: &Path,
    options: &CompareOptions,
    status: &mut dyn StatusSink,
) -> Result<CompareReport, CompareError> {
    status.status("Starting comparison...");

    for input in [left, right] {
        if !input.exists() {
            return Err(CompareError::MissingInput {
                path: input.to_path_buf(),
            });
        }
    }

    std::fs::create_dir_all(&options.output_dir).map_err(|source| CompareError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let left_wb = load(left, options, status)?;
    let right_wb = load(right, options, status)?;

    status.status("Comparing and highlighting matches...");
    let annotation = Annotator::with_pairing(options.pairing).annotate(&left_wb, &right_wb);
    tracing::debug!(
        sheet_pairs = annotation.sheet_pairs,
        matched_pairs = annotation.matched_pairs,
        "annotation finished"
    );

    let (left_output, right_output) = options.output_paths(left, right);

    status.status("Saving highlighted files...");
    save(&annotation.left, &options.palette, &left_output)?;
    save(&annotation.right, &options.palette, &right_output)?;

    status.status(&format!(
        "Comparison complete. Highlighted files saved to:\n- {}\n- {}",
        left_output.display(),
        right_output.display()
    ));

    Ok(CompareReport {
        left: annotation.left.summary(),
        right: annotation.right.summary(),
        sheet_pairs: annotation.sheet_pairs,
        matched_pairs: annotation.matched_pairs,
        left_output,
        right_output,
    })
}

fn load(
    path: &Path,
    options: &CompareOptions,
    status: &mut dyn StatusSink,
) -> Result<Workbook, CompareError> {
    status.status(&format!("Loading {}...", path.display()));
    Workbook::open_with(path, &options.csv).map_err(|source| CompareError::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn save(
    annotated: &AnnotatedWorkbook,
    palette: &HighlightPalette,
    path: &Path,
) -> Result<(), CompareError> {
    XlsxWriter::write_file(annotated, palette, path).map_err(|source| CompareError::Write {
        path: path.to_path_buf(),
        source,
    })
}
