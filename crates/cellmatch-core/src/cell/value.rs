//! Cell value types

use std::fmt;

use chrono::NaiveDateTime;

use super::date::is_time_only;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Date-formatted number, resolved to a timestamp.
    ///
    /// Bare times of day carry the date 1899-12-30.
    DateTime(NaiveDateTime),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Whether the cell takes part in value comparison.
    ///
    /// Empty cells, empty strings and error literals count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error(_) => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether the cell holds a bare time of day
    pub fn is_time_of_day(&self) -> bool {
        matches!(self, CellValue::DateTime(dt) if is_time_only(dt))
    }

    /// Canonical string form used for equality comparison.
    ///
    /// Returns `None` for missing cells. Integral numbers below 1e15 print
    /// without a fractional part, so `100.0` and `"100"` normalize alike.
    /// Timestamps print as `YYYY-MM-DD HH:MM:SS` (times of day as
    /// `HH:MM:SS`), which never reads as a number.
    ///
    /// ```
    /// use cellmatch_core::CellValue;
    ///
    /// assert_eq!(CellValue::Number(100.0).normalized().as_deref(), Some("100"));
    /// assert_eq!(CellValue::Number(2.5).normalized().as_deref(), Some("2.5"));
    /// assert_eq!(CellValue::Empty.normalized(), None);
    /// ```
    pub fn normalized(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::String(s) if s.is_empty() => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::DateTime(dt) => Some(format_datetime(dt)),
            CellValue::String(s) => Some(s.clone()),
            CellValue::Boolean(b) => Some(bool_text(*b).to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    if is_time_only(dt) {
        dt.format("%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", bool_text(*b)),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::DateTime(dt) => write!(f, "{}", format_datetime(dt)),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Empty, Into::into)
    }
}

/// Excel error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL!
    Null,
    /// #DIV/0!
    Div0,
    /// #VALUE!
    Value,
    /// #REF!
    Ref,
    /// #NAME?
    Name,
    /// #NUM!
    Num,
    /// #N/A
    Na,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
        }
    }

    /// Parse an error string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NULL!" => Some(CellError::Null),
            "#DIV/0!" => Some(CellError::Div0),
            "#VALUE!" => Some(CellError::Value),
            "#REF!" => Some(CellError::Ref),
            "#NAME?" => Some(CellError::Name),
            "#NUM!" => Some(CellError::Num),
            "#N/A" => Some(CellError::Na),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_numbers() {
        assert_eq!(CellValue::Number(100.0).normalized().unwrap(), "100");
        assert_eq!(CellValue::Number(-3.0).normalized().unwrap(), "-3");
        assert_eq!(CellValue::Number(0.1).normalized().unwrap(), "0.1");
        assert_eq!(CellValue::Number(1e20).normalized().unwrap(), "100000000000000000000");
    }

    #[test]
    fn test_normalized_text_is_verbatim() {
        assert_eq!(CellValue::from(" Paris ").normalized().unwrap(), " Paris ");
        assert_eq!(CellValue::from("100").normalized().unwrap(), "100");
    }

    #[test]
    fn test_missing_values() {
        assert!(CellValue::Empty.is_missing());
        assert!(CellValue::Error(CellError::Na).is_missing());
        assert_eq!(CellValue::Error(CellError::Div0).normalized(), None);
        assert!(CellValue::from("").is_missing());
        assert_eq!(CellValue::from("").normalized(), None);
        assert!(!CellValue::from(false).is_missing());
        assert_eq!(CellValue::from(false).normalized().unwrap(), "FALSE");
    }

    #[test]
    fn test_normalized_datetimes() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let midnight = CellValue::from(date.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(midnight.normalized().unwrap(), "2024-01-01 00:00:00");
        assert_eq!(midnight.to_string(), "2024-01-01 00:00:00");

        let noon = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        assert_eq!(CellValue::from(noon).normalized().unwrap(), "12:30:00");
        assert!(CellValue::from(noon).is_time_of_day());
        assert!(!midnight.is_time_of_day());
        assert!(!CellValue::from(noon).is_missing());
    }

    #[test]
    fn test_error_parse() {
        assert_eq!(CellError::parse("#n/a"), Some(CellError::Na));
        assert_eq!(CellError::parse("#BOGUS"), None);
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<f64>), CellValue::Empty);
        assert_eq!(CellValue::from(Some(2)), CellValue::Number(2.0));
    }
}
