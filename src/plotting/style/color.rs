//! Color definitions and utilities.

use std::fmt;

use plotters::style::RGBAColor;

/// Represents a color for plotting elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// RGB color with values 0-255
    Rgb(u8, u8, u8),
    /// RGBA color with alpha 0.0-1.0
    Rgba(u8, u8, u8, f64),
    /// Named color (e.g., "red", "tab:blue", "C0")
    Named(String),
}

impl Color {
    /// Create a new RGB color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r, g, b)
    }

    /// Create a new RGBA color.
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color::Rgba(r, g, b, a.clamp(0.0, 1.0))
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::Rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)? as f64 / 255.0,
            )),
            _ => None,
        }
    }

    /// Get the alpha value (opacity) of the color.
    pub fn alpha(&self) -> f64 {
        match self {
            Color::Rgba(_, _, _, a) => *a,
            Color::Rgb(..) | Color::Named(_) => 1.0,
        }
    }

    /// Convert to RGB tuple, resolving named colors. Unknown names are black.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Rgb(r, g, b) => (*r, *g, *b),
            Color::Rgba(r, g, b, _) => (*r, *g, *b),
            Color::Named(name) => resolve_named_color(name).unwrap_or((0, 0, 0)),
        }
    }

    /// Same color with the given opacity.
    pub fn with_alpha(&self, alpha: f64) -> Self {
        let (r, g, b) = self.to_rgb();
        Color::rgba(r, g, b, alpha)
    }

    /// Convert to the color type the drawing backend consumes.
    pub fn to_plotters(&self) -> RGBAColor {
        let (r, g, b) = self.to_rgb();
        RGBAColor(r, g, b, self.alpha())
    }

    /// Hex representation, `#rrggbb` or `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        match self {
            Color::Rgba(_, _, _, a) => format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                r,
                g,
                b,
                (a * 255.0).round() as u8
            ),
            _ => format!("#{:02x}{:02x}{:02x}", r, g, b),
        }
    }

    // Predefined colors
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 128, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const GRAY: Color = Color::Rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::Rgb(211, 211, 211);
    pub const DARK_GRAY: Color = Color::Rgb(64, 64, 64);
    pub const TRANSPARENT: Color = Color::Rgba(0, 0, 0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        cycle_color(0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name) => write!(f, "{}", name),
            _ => write!(f, "{}", self.to_hex()),
        }
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        if s.starts_with('#') || s.chars().all(|c| c.is_ascii_hexdigit()) && s.len() >= 6 {
            Color::from_hex(s).unwrap_or_else(|| Color::Named(s.to_string()))
        } else {
            Color::Named(s.to_string())
        }
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Color::from(s.as_str())
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::Rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, f64)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, f64)) -> Self {
        Color::rgba(r, g, b, a)
    }
}

/// Matplotlib's default color cycle.
const TAB10: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// Resolve a named color to RGB.
fn resolve_named_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name.to_lowercase().as_str() {
        // Basic colors
        "black" | "k" => (0, 0, 0),
        "white" | "w" => (255, 255, 255),
        "red" | "r" => (255, 0, 0),
        "green" | "g" => (0, 128, 0),
        "blue" | "b" => (0, 0, 255),
        "yellow" | "y" => (255, 255, 0),
        "cyan" | "aqua" | "c" => (0, 255, 255),
        "magenta" | "fuchsia" | "m" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "darkgray" | "darkgrey" => (64, 64, 64),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "olive" => (128, 128, 0),
        "maroon" => (128, 0, 0),
        "lime" => (0, 255, 0),
        "silver" => (192, 192, 192),

        // Matplotlib cycle colors
        "c0" | "tab:blue" => TAB10[0],
        "c1" | "tab:orange" => TAB10[1],
        "c2" | "tab:green" => TAB10[2],
        "c3" | "tab:red" => TAB10[3],
        "c4" | "tab:purple" => TAB10[4],
        "c5" | "tab:brown" => TAB10[5],
        "c6" | "tab:pink" => TAB10[6],
        "c7" | "tab:gray" | "tab:grey" => TAB10[7],
        "c8" | "tab:olive" => TAB10[8],
        "c9" | "tab:cyan" => TAB10[9],

        _ => return None,
    };
    Some(rgb)
}

/// Get a color from the default color cycle by index.
pub fn cycle_color(index: usize) -> Color {
    let (r, g, b) = TAB10[index % TAB10.len()];
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#1f77b4"), Some(Color::Rgb(0x1f, 0x77, 0xb4)));
        assert_eq!(Color::from_hex("zz0000"), None);
        assert_eq!(Color::from_hex("#fff"), None);
        let c = Color::from_hex("ff000080").unwrap();
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_named_resolution() {
        assert_eq!(Color::from("tab:orange").to_rgb(), (0xff, 0x7f, 0x0e));
        assert_eq!(Color::from("C3"), Color::Named("C3".to_string()));
        assert_eq!(Color::from("C3").to_rgb(), (0xd6, 0x27, 0x28));
        assert_eq!(Color::from("no-such-color").to_rgb(), (0, 0, 0));
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle_color(0), cycle_color(10));
        assert_eq!(cycle_color(1).to_hex(), "#ff7f0e");
    }

    #[test]
    fn test_to_plotters_keeps_alpha() {
        let c = Color::rgba(10, 20, 30, 0.5).to_plotters();
        assert_eq!((c.0, c.1, c.2), (10, 20, 30));
        assert!((c.3 - 0.5).abs() < 1e-12);
    }
}
