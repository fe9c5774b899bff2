//! Line styling options.

use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::PathElement;
use plotters::prelude::DrawingBackend;
use plotters::style::ShapeStyle;

use super::color::Color;
use crate::plotting::error::PlotResult;

/// Dash pattern for lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashPattern {
    /// Solid line
    #[default]
    Solid,
    /// Dashed line (default dash length)
    Dashed,
    /// Dotted line
    Dotted,
    /// Alternating dash-dot pattern
    DashDot,
    /// Line hidden, markers only
    None,
    /// Custom dash array [dash_length, gap_length, ...] in multiples of the line width
    Custom(Vec<f64>),
}

impl DashPattern {
    /// Parse from matplotlib-style format string (prefix match).
    pub fn from_format_str(s: &str) -> Option<Self> {
        // Check longest patterns first
        if s.starts_with("--") {
            Some(DashPattern::Dashed)
        } else if s.starts_with("-.") {
            Some(DashPattern::DashDot)
        } else if s.starts_with(':') {
            Some(DashPattern::Dotted)
        } else if s.starts_with('-') {
            Some(DashPattern::Solid)
        } else if s.is_empty() || s == "None" || s == " " {
            Some(DashPattern::None)
        } else {
            None
        }
    }

    /// Matplotlib format string for this pattern.
    pub fn format_str(&self) -> &'static str {
        match self {
            DashPattern::Solid => "-",
            DashPattern::Dashed => "--",
            DashPattern::Dotted => ":",
            DashPattern::DashDot => "-.",
            DashPattern::None => "None",
            DashPattern::Custom(_) => "custom",
        }
    }

    /// On/off lengths in pixels for a line of the given width. `None` for
    /// solid lines.
    pub fn dash_array(&self, width: f64) -> Option<Vec<f64>> {
        let unit = width.max(1.0);
        let scaled = |arr: &[f64]| arr.iter().map(|v| v * unit).collect();
        match self {
            DashPattern::Solid | DashPattern::None => None,
            DashPattern::Dashed => Some(scaled(&[3.7, 1.6])),
            DashPattern::Dotted => Some(scaled(&[1.0, 1.65])),
            DashPattern::DashDot => Some(scaled(&[6.4, 1.6, 1.0, 1.6])),
            DashPattern::Custom(arr) if arr.iter().any(|v| *v > 0.0) => Some(scaled(arr)),
            DashPattern::Custom(_) => None,
        }
    }
}

/// Split a pixel polyline into the visible pieces of a dash pattern.
pub fn dash_polyline(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut pieces = Vec::new();
    if points.len() < 2 || pattern.is_empty() || pattern.iter().all(|v| *v <= 0.0) {
        if points.len() >= 2 {
            pieces.push(points.to_vec());
        }
        return pieces;
    }

    let mut index = 0;
    let mut remaining = pattern[0];
    let mut current: Vec<(f64, f64)> = vec![points[0]];

    for pair in points.windows(2) {
        let (mut x0, mut y0) = pair[0];
        let (x1, y1) = pair[1];
        let mut seg_len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();

        while seg_len > remaining {
            let t = remaining / seg_len;
            let (xm, ym) = (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            if index % 2 == 0 {
                current.push((xm, ym));
                pieces.push(std::mem::take(&mut current));
            } else {
                current = vec![(xm, ym)];
            }
            seg_len -= remaining;
            x0 = xm;
            y0 = ym;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }
        remaining -= seg_len;
        if index % 2 == 0 {
            current.push((x1, y1));
        }
    }
    if index % 2 == 0 && current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

/// Style configuration for lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// Line color
    pub color: Color,
    /// Line width in pixels
    pub width: f64,
    /// Dash pattern
    pub dash: DashPattern,
}

impl LineStyle {
    /// Create a new line style with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line color.
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the line width.
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the dash pattern.
    pub fn dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    /// Whether drawing this style leaves any visible trace.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.dash != DashPattern::None
    }

    pub fn to_shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color.to_plotters(),
            filled: false,
            stroke_width: self.width.round().max(1.0) as u32,
        }
    }

    /// Draw a polyline given in pixel coordinates of `area`.
    pub fn draw_polyline<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        points: &[(f64, f64)],
    ) -> PlotResult<()> {
        if !self.is_visible() || points.len() < 2 {
            return Ok(());
        }
        let style = self.to_shape_style();
        let pieces = match self.dash.dash_array(self.width) {
            Some(pattern) => dash_polyline(points, &pattern),
            None => vec![points.to_vec()],
        };
        for piece in pieces {
            let pixels: Vec<(i32, i32)> = piece
                .into_iter()
                .map(|(x, y)| (x.round() as i32, y.round() as i32))
                .collect();
            area.draw(&PathElement::new(pixels, style))?;
        }
        Ok(())
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: Color::default(),
            width: 1.5,
            dash: DashPattern::Solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_format_str() {
        assert_eq!(DashPattern::from_format_str("--"), Some(DashPattern::Dashed));
        assert_eq!(DashPattern::from_format_str("-."), Some(DashPattern::DashDot));
        assert_eq!(DashPattern::from_format_str(":"), Some(DashPattern::Dotted));
        assert_eq!(DashPattern::from_format_str("-"), Some(DashPattern::Solid));
        assert_eq!(DashPattern::from_format_str("None"), Some(DashPattern::None));
        assert_eq!(DashPattern::from_format_str("~"), None);
    }

    #[test]
    fn test_dash_polyline_splits_straight_line() {
        let pieces = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], &[2.0, 3.0]);
        // dashes at [0,2], [5,7]; the third starts at 10 and has no length
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(pieces[1], vec![(5.0, 0.0), (7.0, 0.0)]);
    }

    #[test]
    fn test_dash_polyline_across_vertices() {
        let pieces = dash_polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 4.0)], &[3.0, 1.0]);
        assert_eq!(pieces[0], vec![(0.0, 0.0), (1.0, 0.0), (1.0, 2.0)]);
        assert_eq!(pieces[1][0], (1.0, 3.0));
    }

    #[test]
    fn test_solid_has_no_dash_array() {
        assert!(DashPattern::Solid.dash_array(2.0).is_none());
        assert_eq!(DashPattern::Dashed.dash_array(2.0), Some(vec![7.4, 3.2]));
    }
}
