//! cellmatch CLI - highlight values shared by two spreadsheets

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cellmatch::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cellmatch")]
#[command(
    author,
    version,
    about = "Highlight the cell values two spreadsheets have in common"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two spreadsheets and write highlighted copies of both
    Compare {
        /// First spreadsheet (xlsx, xlsm, csv)
        left: Option<PathBuf>,

        /// Second spreadsheet (xlsx, xlsm, csv)
        right: Option<PathBuf>,

        /// Directory for the highlighted copies
        #[arg(short, long, default_value = cellmatch::DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Suffix appended to each file name
        #[arg(long, default_value = cellmatch::DEFAULT_SUFFIX)]
        suffix: String,

        /// Only compare sheets that have the same name
        #[arg(long)]
        by_name: bool,

        /// Fill for shared numeric values (hex RGB or ARGB)
        #[arg(long, value_parser = parse_color, default_value = "FF0000")]
        numeric_color: Color,

        /// Fill for other shared values (hex RGB or ARGB)
        #[arg(long, value_parser = parse_color, default_value = "FFFF00")]
        generic_color: Color,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("'{}' is not a 6- or 8-digit hex color", s))
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            left,
            right,
            output_dir,
            suffix,
            by_name,
            numeric_color,
            generic_color,
        } => {
            let pairing = if by_name {
                SheetPairing::ByName
            } else {
                SheetPairing::CrossProduct
            };
            let options = CompareOptions::default()
                .with_output_dir(output_dir)
                .with_suffix(suffix)
                .with_pairing(pairing)
                .with_palette(HighlightPalette {
                    numeric: numeric_color,
                    generic: generic_color,
                });

            let mut shell = Shell::new(true);
            if let Some(path) = left {
                shell.select_left(path);
            }
            if let Some(path) = right {
                shell.select_right(path);
            }
            let report = shell.run(&options)?;
            println!(
                "{}: {} numeric, {} generic",
                report.left_output.display(),
                report.left.numeric,
                report.left.generic
            );
            println!(
                "{}: {} numeric, {} generic",
                report.right_output.display(),
                report.right.numeric,
                report.right.generic
            );
            Ok(())
        }
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

/// Front-end state: the two selected inputs and the status transcript
struct Shell {
    left: Option<PathBuf>,
    right: Option<PathBuf>,
    transcript: StatusLog,
    echo: bool,
}

impl Shell {
    /// `echo` prints each status line to stderr as it arrives
    fn new(echo: bool) -> Self {
        Self {
            left: None,
            right: None,
            transcript: StatusLog::new(),
            echo,
        }
    }

    fn select_left(&mut self, path: PathBuf) {
        self.status(&format!("Selected: {}", path.display()));
        self.left = Some(path);
    }

    fn select_right(&mut self, path: PathBuf) {
        self.status(&format!("Selected: {}", path.display()));
        self.right = Some(path);
    }

    fn run(&mut self, options: &CompareOptions) -> Result<CompareReport> {
        let (left, right) = match (self.left.clone(), self.right.clone()) {
            (Some(left), Some(right)) => (left, right),
            _ => {
                self.status("Error: Please select both files.");
                bail!("Please select both files.");
            }
        };

        self.status("Comparison initiated...");
        compare_files(&left, &right, options, self).with_context(|| {
            format!(
                "Failed to compare '{}' with '{}'",
                left.display(),
                right.display()
            )
        })
    }

    fn transcript(&self) -> &[String] {
        self.transcript.messages()
    }
}

impl StatusSink for Shell {
    fn status(&mut self, message: &str) {
        if self.echo {
            eprintln!("{}", message);
        }
        self.transcript.status(message);
    }
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook =
        Workbook::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (i, sheet) in workbook.sheets().enumerate() {
        let table = sheet.table();
        println!(
            "{}\t{}\t{} x {}",
            i,
            sheet.name(),
            table.row_count(),
            table.width()
        );
    }

    Ok(())
}
