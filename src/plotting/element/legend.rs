//! Legend configuration and rendering.

use std::str::FromStr;

use log::warn;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::{PathElement, Rectangle};
use plotters::prelude::DrawingBackend;
use plotters::style::ShapeStyle;

use super::text::{Anchor, Text};
use super::{Bounds, PointScale};
use crate::plotting::error::PlotResult;
use crate::plotting::style::{Color, LineStyle, MarkerStyle};

/// Font size of legend entries, in points.
const LEGEND_FONT_SIZE: f64 = 10.0;
/// Gap between the legend box and the frame, in points.
const BORDER_PAD: f64 = 5.0;

/// Position of the legend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LegendPosition {
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    #[default]
    TopRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
    /// Center top
    Top,
    /// Center bottom
    Bottom,
    /// Center left
    Left,
    /// Center right
    Right,
    /// Center
    Center,
    /// Upper right corner of the box at (x, y), in frame-normalized
    /// coordinates with y pointing up
    Anchored(f64, f64),
}

impl LegendPosition {
    /// Fractions locating the box corner that sits on the anchor: 0 is the
    /// left/bottom edge, 1 the right/top edge.
    fn alignment(&self) -> (f64, f64) {
        match self {
            LegendPosition::TopLeft => (0.0, 1.0),
            LegendPosition::TopRight | LegendPosition::Anchored(..) => (1.0, 1.0),
            LegendPosition::BottomLeft => (0.0, 0.0),
            LegendPosition::BottomRight => (1.0, 0.0),
            LegendPosition::Top => (0.5, 1.0),
            LegendPosition::Bottom => (0.5, 0.0),
            LegendPosition::Left => (0.0, 0.5),
            LegendPosition::Right => (1.0, 0.5),
            LegendPosition::Center => (0.5, 0.5),
        }
    }

    /// Place a `width` x `height` box inside (or, when anchored, relative to)
    /// the frame. `inset` is the gap to the frame edge in pixels.
    pub fn place(&self, frame: Bounds, width: f64, height: f64, inset: f64) -> Bounds {
        let (ax, ay) = self.alignment();
        let (x_anchor, y_anchor) = match self {
            LegendPosition::Anchored(x, y) => (
                frame.x_min + frame.width() * x,
                frame.y_max - frame.height() * y,
            ),
            _ => (
                frame.x_min + inset + (frame.width() - 2.0 * inset) * ax,
                frame.y_max - inset - (frame.height() - 2.0 * inset) * ay,
            ),
        };
        let x_min = x_anchor - width * ax;
        let y_min = y_anchor - height * (1.0 - ay);
        Bounds::new(x_min, x_min + width, y_min, y_min + height)
    }
}

impl FromStr for LegendPosition {
    type Err = String;

    /// Parse a matplotlib `loc` string. `best` resolves to the upper right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" | "upper right" => Ok(LegendPosition::TopRight),
            "upper left" => Ok(LegendPosition::TopLeft),
            "lower left" => Ok(LegendPosition::BottomLeft),
            "lower right" => Ok(LegendPosition::BottomRight),
            "right" | "center right" => Ok(LegendPosition::Right),
            "center left" => Ok(LegendPosition::Left),
            "lower center" => Ok(LegendPosition::Bottom),
            "upper center" => Ok(LegendPosition::Top),
            "center" => Ok(LegendPosition::Center),
            other => Err(format!("unknown legend location '{}'", other)),
        }
    }
}

impl LegendPosition {
    /// Parse a location, falling back to the default with a warning.
    pub fn parse_or_default(loc: &str) -> Self {
        loc.parse().unwrap_or_else(|e| {
            warn!("{}, using upper right", e);
            LegendPosition::default()
        })
    }
}

/// A single entry in the legend.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    /// Label text
    pub label: String,
    /// Line style (if applicable)
    pub line_style: Option<LineStyle>,
    /// Marker style (if applicable)
    pub marker_style: Option<MarkerStyle>,
    /// Filled patch color (pie wedges, bars)
    pub patch: Option<Color>,
}

impl LegendEntry {
    /// Create a new legend entry with just a label.
    pub fn new(label: impl Into<String>) -> Self {
        LegendEntry {
            label: label.into(),
            line_style: None,
            marker_style: None,
            patch: None,
        }
    }

    /// Set the line style.
    pub fn line_style(mut self, style: LineStyle) -> Self {
        self.line_style = Some(style);
        self
    }

    /// Set the marker style.
    pub fn marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = Some(style);
        self
    }

    /// Show a filled patch instead of a line sample.
    pub fn patch(mut self, color: Color) -> Self {
        self.patch = Some(color);
        self
    }
}

/// Legend configuration.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    /// Legend entries
    pub entries: Vec<LegendEntry>,
    /// Position of the legend
    pub position: LegendPosition,
}

impl Legend {
    /// Create a new legend.
    pub fn new(position: LegendPosition) -> Self {
        Legend {
            entries: Vec::new(),
            position,
        }
    }

    /// Add an entry to the legend.
    pub fn add_entry(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }

    /// Draw the legend box in the given frame. Entries with empty labels are
    /// left out; nothing is drawn when none remain.
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        frame: Bounds,
        scale: PointScale,
    ) -> PlotResult<()> {
        let entries: Vec<&LegendEntry> =
            self.entries.iter().filter(|e| !e.label.is_empty()).collect();
        if entries.is_empty() {
            return Ok(());
        }

        let font_px = scale.px(LEGEND_FONT_SIZE);
        let padding = font_px * 0.4;
        let handle_len = font_px * 2.0;
        let handle_gap = font_px * 0.8;
        let row_gap = font_px * 0.5;

        let texts: Vec<Text> = entries
            .iter()
            .map(|e| Text::new(&e.label, font_px).anchor(Anchor::LEFT_CENTER))
            .collect();
        let extents: Vec<(f64, f64)> = texts.iter().map(|t| t.extent(area)).collect();
        let row_h = extents.iter().map(|e| e.1).fold(font_px, f64::max);
        let text_w = extents.iter().map(|e| e.0).fold(0.0, f64::max);

        let width = padding * 2.0 + handle_len + handle_gap + text_w;
        let height = padding * 2.0 + row_h * entries.len() as f64
            + row_gap * (entries.len() - 1) as f64;
        let bounds = self
            .position
            .place(frame, width, height, scale.px(BORDER_PAD));

        area.draw(&Rectangle::new(
            bounds.corners(),
            ShapeStyle {
                color: Color::WHITE.with_alpha(0.8).to_plotters(),
                filled: true,
                stroke_width: 1,
            },
        ))?;
        area.draw(&Rectangle::new(
            bounds.corners(),
            ShapeStyle {
                color: Color::LIGHT_GRAY.to_plotters(),
                filled: false,
                stroke_width: 1,
            },
        ))?;

        for (i, (entry, text)) in entries.iter().zip(texts).enumerate() {
            let cy = bounds.y_min + padding + row_h * (i as f64 + 0.5) + row_gap * i as f64;
            let x0 = bounds.x_min + padding;
            let x1 = x0 + handle_len;

            if let Some(color) = &entry.patch {
                let half = row_h * 0.35;
                area.draw(&Rectangle::new(
                    [
                        (x0.round() as i32, (cy - half).round() as i32),
                        (x1.round() as i32, (cy + half).round() as i32),
                    ],
                    ShapeStyle {
                        color: color.to_plotters(),
                        filled: true,
                        stroke_width: 1,
                    },
                ))?;
            }
            if let Some(line) = entry.line_style.as_ref().filter(|l| l.is_visible()) {
                let y = cy.round() as i32;
                area.draw(&PathElement::new(
                    vec![(x0.round() as i32, y), (x1.round() as i32, y)],
                    line.to_shape_style(),
                ))?;
            }
            if let Some(marker) = &entry.marker_style {
                let mx = (x0 + x1) / 2.0;
                marker.draw_at(area, (mx.round() as i32, cy.round() as i32))?;
            }
            text.draw(area, ((x1 + handle_gap).round() as i32, cy.round() as i32))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locations() {
        assert_eq!("best".parse(), Ok(LegendPosition::TopRight));
        assert_eq!("lower center".parse(), Ok(LegendPosition::Bottom));
        assert_eq!("Upper Left".parse(), Ok(LegendPosition::TopLeft));
        assert!("somewhere".parse::<LegendPosition>().is_err());
        assert_eq!(LegendPosition::parse_or_default("nowhere"), LegendPosition::TopRight);
    }

    #[test]
    fn test_place_corners() {
        let frame = Bounds::new(0.0, 100.0, 0.0, 50.0);
        let b = LegendPosition::TopRight.place(frame, 20.0, 10.0, 5.0);
        assert_eq!(b, Bounds::new(75.0, 95.0, 5.0, 15.0));

        let b = LegendPosition::BottomLeft.place(frame, 20.0, 10.0, 5.0);
        assert_eq!(b, Bounds::new(5.0, 25.0, 35.0, 45.0));

        let b = LegendPosition::Bottom.place(frame, 20.0, 10.0, 5.0);
        assert_eq!(b, Bounds::new(40.0, 60.0, 35.0, 45.0));
    }

    #[test]
    fn test_place_anchored() {
        let frame = Bounds::new(0.0, 100.0, 0.0, 100.0);
        let b = LegendPosition::Anchored(0.5, 0.5).place(frame, 20.0, 10.0, 5.0);
        assert_eq!(b, Bounds::new(30.0, 50.0, 50.0, 60.0));
    }
}
