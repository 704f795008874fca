//! Workbook: an ordered mapping from sheet name to [`Table`]

use crate::error::{Error, Result};
use crate::table::Table;
use crate::MAX_SHEET_NAME_LEN;

/// A named sheet inside a [`Workbook`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    table: Table,
}

impl Sheet {
    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sheet contents
    pub fn table(&self) -> &Table {
        &self.table
    }
}

/// An ordered collection of uniquely named tables.
///
/// Sheet order is insertion order, matching the order sheets appear in the
/// source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a sheet's table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.table)
    }

    /// Get a sheet index by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    /// Iterate over sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Append a sheet, returning its index
    pub fn add_sheet(&mut self, name: &str, table: Table) -> Result<usize> {
        self.validate_sheet_name(name)?;
        Ok(self.push_sheet(name, table))
    }

    /// Append a sheet read from an existing file, returning its index.
    ///
    /// Other writers emit names Excel would not let a user type (over 31
    /// characters, say), so only an exact duplicate is rejected.
    pub fn add_loaded_sheet(&mut self, name: &str, table: Table) -> Result<usize> {
        if self.sheet_index(name).is_some() {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(self.push_sheet(name, table))
    }

    fn push_sheet(&mut self, name: &str, table: Table) -> usize {
        self.sheets.push(Sheet {
            name: name.to_string(),
            table,
        });
        self.sheets.len() - 1
    }

    /// Builder-style [`add_sheet`](Workbook::add_sheet)
    pub fn with_sheet(mut self, name: &str, table: Table) -> Result<Self> {
        self.add_sheet(name, table)?;
        Ok(self)
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        for c in INVALID_SHEET_NAME_CHARS {
            if name.contains(*c) {
                return Err(Error::InvalidSheetName(format!(
                    "Sheet name cannot contain '{}'",
                    c
                )));
            }
        }

        // Excel treats sheet names case-insensitively
        let name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|s| s.name.to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }

        Ok(())
    }
}

/// Characters Excel rejects in sheet names
pub const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Turn arbitrary text (e.g. a file stem) into a usable sheet name
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if INVALID_SHEET_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_order_is_preserved() {
        let wb = Workbook::new()
            .with_sheet("Zeta", Table::default())
            .and_then(|wb| wb.with_sheet("Alpha", Table::default()))
            .unwrap();

        assert_eq!(wb.sheet_names(), vec!["Zeta", "Alpha"]);
        assert_eq!(wb.sheet_index("Alpha"), Some(1));
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        wb.add_sheet("Data", Table::default()).unwrap();
        assert!(matches!(
            wb.add_sheet("data", Table::default()),
            Err(Error::DuplicateSheetName(_))
        ));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();
        assert!(wb.add_sheet("", Table::default()).is_err());
        assert!(wb.add_sheet("a/b", Table::default()).is_err());
        assert!(wb.add_sheet(&"x".repeat(32), Table::default()).is_err());
        assert!(wb.add_sheet(&"x".repeat(31), Table::default()).is_ok());
    }

    #[test]
    fn test_loaded_sheet_names_skip_creation_rules() {
        let long = "Quarterly revenue by region and product";
        let mut wb = Workbook::new();
        assert_eq!(wb.add_loaded_sheet(long, Table::default()).unwrap(), 0);
        assert_eq!(wb.add_loaded_sheet("a/b", Table::default()).unwrap(), 1);
        assert_eq!(wb.sheet_names(), vec![long, "a/b"]);
        assert!(matches!(
            wb.add_loaded_sheet(long, Table::default()),
            Err(Error::DuplicateSheetName(_))
        ));
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("sales [2024]"), "sales _2024_");
        assert_eq!(sanitize_sheet_name("   "), "Sheet1");
        assert_eq!(sanitize_sheet_name(&"y".repeat(40)).chars().count(), 31);
    }
}
