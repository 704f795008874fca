//! Cell styling types
//!
//! - [`Color`] - Color representation
//! - [`FillStyle`] - Background fill
//! - [`HighlightPalette`] - Fill applied for each [`Highlight`] severity

mod color;
mod fill;

pub use color::Color;
pub use fill::FillStyle;

use crate::highlight::Highlight;

/// Solid fill colors used to paint highlighted cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightPalette {
    /// Fill for values present in both sheets that parse as numbers
    pub numeric: Color,
    /// Fill for every other value present in both sheets
    pub generic: Color,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self {
            numeric: Color::RED,
            generic: Color::YELLOW,
        }
    }
}

impl HighlightPalette {
    /// Fill for a highlight severity
    pub fn fill_for(&self, highlight: Highlight) -> FillStyle {
        match highlight {
            Highlight::None => FillStyle::None,
            Highlight::Generic => FillStyle::solid(self.generic),
            Highlight::Numeric => FillStyle::solid(self.numeric),
        }
    }
}
