//! Visual elements drawn in pixel space: axis frames, legends and text.

mod axis;
mod legend;
pub mod text;

pub use axis::{AxisFrame, Spines, TickSet, TICK_LABEL_SIZE};
pub use legend::{Legend, LegendEntry, LegendPosition};
pub use text::{Anchor, Text};

/// Pixel rectangle, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Create a new bounds with the given values.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Create bounds from corner points.
    pub fn from_points(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Bounds {
            x_min: x1.min(x2),
            x_max: x1.max(x2),
            y_min: y1.min(y2),
            y_max: y1.max(y2),
        }
    }

    /// Get the width of the bounds.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Get the height of the bounds.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Get the center point.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Corners as integer pixel coordinates (upper left, lower right).
    pub fn corners(&self) -> [(i32, i32); 2] {
        [
            (self.x_min.round() as i32, self.y_min.round() as i32),
            (self.x_max.round() as i32, self.y_max.round() as i32),
        ]
    }
}

/// Converts typographic points to pixels at a given resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    dpi: f64,
}

impl PointScale {
    pub fn new(dpi: u32) -> Self {
        PointScale { dpi: dpi as f64 }
    }

    /// Pixels covered by `points` (1/72 inch).
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Pixels covered by `inches`.
    pub fn inches(&self, inches: f64) -> u32 {
        (inches * self.dpi).round().max(1.0) as u32
    }
}
