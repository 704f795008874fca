//! Color representation

use std::fmt;

/// An opaque or translucent RGB color, as stored in XLSX fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },
}

impl Color {
    /// Pure red
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);

    /// Pure yellow
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create from a hex string (e.g., "#FF0000", "FF0000" or "FFFF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            6 => Some(Color::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Convert to ARGB hex string (8 characters, used by XLSX)
    ///
    /// Always returns an 8-character string with alpha, e.g., "FFFF0000" for opaque red.
    pub fn to_argb_hex(&self) -> String {
        match self {
            Color::Rgb { r, g, b } => format!("FF{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
        }
    }

    /// Compare ignoring representation: opaque ARGB equals the same RGB
    pub fn same_as(&self, other: &Color) -> bool {
        self.to_argb_hex() == other.to_argb_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { .. } => write!(f, "#{}", self.to_argb_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("ffff00"), Some(Color::YELLOW));
        assert_eq!(
            Color::from_hex("80112233"),
            Some(Color::argb(0x80, 0x11, 0x22, 0x33))
        );
        assert_eq!(Color::from_hex("FF00"), None);
        assert_eq!(Color::from_hex("GG0000"), None);
        assert_eq!(Color::from_hex("ÿÿÿ"), None);
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(Color::RED.to_argb_hex(), "FFFF0000");
        assert_eq!(Color::argb(0, 1, 2, 3).to_argb_hex(), "00010203");
    }

    #[test]
    fn test_same_as() {
        assert!(Color::argb(0xFF, 0xFF, 0xFF, 0x00).same_as(&Color::YELLOW));
        assert!(!Color::RED.same_as(&Color::YELLOW));
        assert_eq!(Color::YELLOW.to_string(), "#FFFF00");
    }
}
