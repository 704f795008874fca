//! CSV options

/// Options for reading CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether the first record is the header row
    pub has_header: bool,
    /// Read numbers and booleans as typed values instead of text
    pub auto_detect_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            auto_detect_types: true,
        }
    }
}

impl CsvReadOptions {
    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first record is the header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Enable or disable type detection
    pub fn with_type_detection(mut self, enabled: bool) -> Self {
        self.auto_detect_types = enabled;
        self
    }
}
