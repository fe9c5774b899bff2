//! Marker styles for scatter plots and line plot points.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::{Circle, PathElement, Polygon};
use plotters::prelude::DrawingBackend;
use plotters::style::ShapeStyle;

use super::color::Color;
use crate::plotting::error::PlotResult;

/// Marker shapes for data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    /// No marker
    #[default]
    None,
    /// Circle marker
    Circle,
    /// Square marker
    Square,
    /// Upward-pointing triangle
    Triangle,
    /// Downward-pointing triangle
    TriangleDown,
    /// Left-pointing triangle
    TriangleLeft,
    /// Right-pointing triangle
    TriangleRight,
    /// Diamond marker
    Diamond,
    /// Plus sign
    Plus,
    /// X/Cross marker
    Cross,
    /// Star marker
    Star,
    /// Pentagon marker
    Pentagon,
    /// Hexagon marker
    Hexagon,
}

/// Outline of a marker relative to its center, in pixels with y pointing down.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    Circle(f64),
    Polygon(Vec<(f64, f64)>),
    Strokes(Vec<[(f64, f64); 2]>),
}

impl Marker {
    /// Parse from matplotlib-style format character.
    pub fn from_format_char(c: char) -> Option<Self> {
        match c {
            'o' => Some(Marker::Circle),
            's' => Some(Marker::Square),
            '^' => Some(Marker::Triangle),
            'v' => Some(Marker::TriangleDown),
            '<' => Some(Marker::TriangleLeft),
            '>' => Some(Marker::TriangleRight),
            'D' | 'd' => Some(Marker::Diamond),
            '+' => Some(Marker::Plus),
            'x' | 'X' => Some(Marker::Cross),
            '*' => Some(Marker::Star),
            'p' => Some(Marker::Pentagon),
            'h' | 'H' => Some(Marker::Hexagon),
            _ => None,
        }
    }

    /// The matplotlib format code, or `None` for no marker.
    pub fn format_char(&self) -> Option<char> {
        match self {
            Marker::None => None,
            Marker::Circle => Some('o'),
            Marker::Square => Some('s'),
            Marker::Triangle => Some('^'),
            Marker::TriangleDown => Some('v'),
            Marker::TriangleLeft => Some('<'),
            Marker::TriangleRight => Some('>'),
            Marker::Diamond => Some('D'),
            Marker::Plus => Some('+'),
            Marker::Cross => Some('x'),
            Marker::Star => Some('*'),
            Marker::Pentagon => Some('p'),
            Marker::Hexagon => Some('h'),
        }
    }

    /// Whether the marker is drawn as strokes rather than a filled area.
    pub fn is_stroked(&self) -> bool {
        matches!(self, Marker::Plus | Marker::Cross)
    }

    /// Geometry of the marker for the given radius (half the marker size).
    pub fn shape(&self, size: f64) -> Option<MarkerShape> {
        let shape = match self {
            Marker::None => return None,
            Marker::Circle => MarkerShape::Circle(size),
            Marker::Square => {
                let s = size * 0.9;
                MarkerShape::Polygon(vec![(-s, -s), (s, -s), (s, s), (-s, s)])
            }
            Marker::Triangle => triangle(size, -FRAC_PI_2),
            Marker::TriangleDown => triangle(size, FRAC_PI_2),
            Marker::TriangleLeft => triangle(size, PI),
            Marker::TriangleRight => triangle(size, 0.0),
            Marker::Diamond => {
                let s = size * 1.2;
                MarkerShape::Polygon(vec![(0.0, -s), (s * 0.7, 0.0), (0.0, s), (-s * 0.7, 0.0)])
            }
            Marker::Plus => MarkerShape::Strokes(vec![
                [(-size, 0.0), (size, 0.0)],
                [(0.0, -size), (0.0, size)],
            ]),
            Marker::Cross => {
                let s = size * 0.707; // 1/sqrt(2)
                MarkerShape::Strokes(vec![[(-s, -s), (s, s)], [(-s, s), (s, -s)]])
            }
            Marker::Star => {
                let points = (0..10)
                    .map(|i| {
                        let r = if i % 2 == 0 { size * 1.1 } else { size * 0.45 };
                        let angle = PI * (i as f64) / 5.0 - FRAC_PI_2;
                        (r * angle.cos(), r * angle.sin())
                    })
                    .collect();
                MarkerShape::Polygon(points)
            }
            Marker::Pentagon => regular_polygon(5, size, -FRAC_PI_2),
            Marker::Hexagon => regular_polygon(6, size, -FRAC_PI_2),
        };
        Some(shape)
    }
}

fn triangle(size: f64, apex_angle: f64) -> MarkerShape {
    regular_polygon(3, size * 1.15, apex_angle)
}

fn regular_polygon(sides: usize, radius: f64, start: f64) -> MarkerShape {
    MarkerShape::Polygon(
        (0..sides)
            .map(|i| {
                let angle = start + 2.0 * PI * (i as f64) / sides as f64;
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect(),
    )
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Marker::None),
            (Some(c), None) => {
                Marker::from_format_char(c).ok_or_else(|| format!("unknown marker '{}'", s))
            }
            _ => Err(format!("unknown marker '{}'", s)),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format_char() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "None"),
        }
    }
}

/// Style configuration for markers.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// The marker shape
    pub marker: Marker,
    /// Marker size (diameter in pixels)
    pub size: f64,
    /// Fill color
    pub fill: Color,
    /// Edge/stroke color; the fill color when unset
    pub edge_color: Option<Color>,
    /// Edge/stroke width in pixels
    pub edge_width: f64,
}

impl MarkerStyle {
    /// Create a new marker style.
    pub fn new(marker: Marker) -> Self {
        MarkerStyle {
            marker,
            ..Default::default()
        }
    }

    /// Set the marker size.
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the fill color.
    pub fn fill(mut self, color: impl Into<Color>) -> Self {
        self.fill = color.into();
        self
    }

    /// Set the edge color.
    pub fn edge_color(mut self, color: impl Into<Color>) -> Self {
        self.edge_color = Some(color.into());
        self
    }

    /// Set the edge width.
    pub fn edge_width(mut self, width: f64) -> Self {
        self.edge_width = width;
        self
    }

    /// Draw the marker centered on a pixel position.
    pub fn draw_at<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        center: (i32, i32),
    ) -> PlotResult<()> {
        let radius = self.size / 2.0;
        if radius <= 0.0 {
            return Ok(());
        }
        let Some(shape) = self.marker.shape(radius) else {
            return Ok(());
        };

        let edge = self.edge_color.as_ref().unwrap_or(&self.fill);
        let stroke_width = self.edge_width.round().max(1.0) as u32;
        let fill_style = ShapeStyle {
            color: self.fill.to_plotters(),
            filled: true,
            stroke_width,
        };
        let edge_style = ShapeStyle {
            color: edge.to_plotters(),
            filled: false,
            stroke_width,
        };
        let at = |(dx, dy): (f64, f64)| {
            (
                center.0 + dx.round() as i32,
                center.1 + dy.round() as i32,
            )
        };

        match shape {
            MarkerShape::Circle(r) => {
                let r = r.round().max(1.0) as u32;
                area.draw(&Circle::new(center, r, fill_style))?;
                if self.edge_color.is_some() {
                    area.draw(&Circle::new(center, r, edge_style))?;
                }
            }
            MarkerShape::Polygon(points) => {
                let pixels: Vec<(i32, i32)> = points.into_iter().map(at).collect();
                area.draw(&Polygon::new(pixels.clone(), fill_style))?;
                if self.edge_color.is_some() {
                    let mut outline = pixels;
                    if let Some(first) = outline.first().copied() {
                        outline.push(first);
                    }
                    area.draw(&PathElement::new(outline, edge_style))?;
                }
            }
            MarkerShape::Strokes(segments) => {
                let style = ShapeStyle {
                    color: self.fill.to_plotters(),
                    filled: false,
                    stroke_width: (self.size / 6.0).round().max(1.0) as u32,
                };
                for [a, b] in segments {
                    area.draw(&PathElement::new(vec![at(a), at(b)], style))?;
                }
            }
        }
        Ok(())
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            marker: Marker::Circle,
            size: 6.0,
            fill: Color::default(),
            edge_color: None,
            edge_width: 1.0,
        }
    }
}
