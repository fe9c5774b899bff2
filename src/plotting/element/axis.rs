//! Axis frame rendering: spines, tick marks, tick labels and axis labels.

use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::PathElement;
use plotters::prelude::DrawingBackend;
use plotters::style::ShapeStyle;

use super::text::{Anchor, Text};
use super::{Bounds, PointScale};
use crate::plotting::error::PlotResult;
use crate::plotting::label::Label;
use crate::plotting::style::Color;

/// Font size of tick labels, in points.
pub const TICK_LABEL_SIZE: f64 = 10.0;
const MAJOR_TICK_LENGTH: f64 = 3.5;
const MAJOR_TICK_WIDTH: f64 = 0.8;
const MINOR_TICK_LENGTH: f64 = 2.0;
const MINOR_TICK_WIDTH: f64 = 0.6;
const SPINE_WIDTH: f64 = 0.8;
/// Gap between a tick mark and its label, in points.
pub const TICK_PAD: f64 = 3.5;
/// Gap between tick labels and the axis label, in points.
pub const LABEL_PAD: f64 = 4.0;

/// Which sides of the frame get a spine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spines {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Spines {
    pub fn all() -> Self {
        Spines {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }

    /// Left and bottom only.
    pub fn open() -> Self {
        Spines {
            right: false,
            top: false,
            ..Spines::all()
        }
    }
}

impl Default for Spines {
    fn default() -> Self {
        Spines::all()
    }
}

/// Tick positions along one axis, already converted to pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSet {
    /// Pixel position and label of each major tick.
    pub major: Vec<(f64, String)>,
    /// Pixel position of each minor tick.
    pub minor: Vec<f64>,
}

/// A plot frame with its ticks and axis labels.
#[derive(Debug, Clone)]
pub struct AxisFrame {
    pub frame: Bounds,
    pub x_ticks: TickSet,
    pub y_ticks: TickSet,
    pub x_label: Label,
    pub y_label: Label,
    pub spines: Spines,
    pub scale: PointScale,
}

impl AxisFrame {
    fn stroke(&self, points: f64) -> ShapeStyle {
        ShapeStyle {
            color: Color::BLACK.to_plotters(),
            filled: false,
            stroke_width: self.scale.px(points).round().max(1.0) as u32,
        }
    }

    fn line<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        from: (f64, f64),
        to: (f64, f64),
        style: ShapeStyle,
    ) -> PlotResult<()> {
        let px = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);
        area.draw(&PathElement::new(vec![px(from), px(to)], style))?;
        Ok(())
    }

    /// Pixels needed below the frame for x tick labels and the x label.
    pub fn bottom_extent<DB: DrawingBackend>(
        x_ticks: &TickSet,
        x_label: &Label,
        scale: PointScale,
        area: &DrawingArea<DB, Shift>,
    ) -> f64 {
        let tick_px = scale.px(TICK_LABEL_SIZE);
        let tick_h = x_ticks
            .major
            .iter()
            .map(|(_, l)| Text::new(l, tick_px).extent(area).1)
            .fold(0.0, f64::max);
        let label_h = if x_label.has_text() {
            Text::new(x_label.label(), scale.px(x_label.size() as f64))
                .extent(area)
                .1
                + scale.px(LABEL_PAD)
        } else {
            0.0
        };
        scale.px(MAJOR_TICK_LENGTH + TICK_PAD) + tick_h + label_h
    }

    /// Pixels needed left of the frame for y tick labels and the y label.
    pub fn left_extent<DB: DrawingBackend>(
        y_ticks: &TickSet,
        y_label: &Label,
        scale: PointScale,
        area: &DrawingArea<DB, Shift>,
    ) -> f64 {
        let tick_px = scale.px(TICK_LABEL_SIZE);
        let tick_w = y_ticks
            .major
            .iter()
            .map(|(_, l)| Text::new(l, tick_px).extent(area).0)
            .fold(0.0, f64::max);
        let label_w = if y_label.has_text() {
            Text::new(y_label.label(), scale.px(y_label.size() as f64))
                .vertical()
                .footprint(area)
                .0
                + scale.px(LABEL_PAD)
        } else {
            0.0
        };
        scale.px(MAJOR_TICK_LENGTH + TICK_PAD) + tick_w + label_w
    }

    /// Draw spines, ticks, tick labels and axis labels.
    pub fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> PlotResult<()> {
        let f = self.frame;
        let spine = self.stroke(SPINE_WIDTH);
        if self.spines.left {
            self.line(area, (f.x_min, f.y_min), (f.x_min, f.y_max), spine)?;
        }
        if self.spines.right {
            self.line(area, (f.x_max, f.y_min), (f.x_max, f.y_max), spine)?;
        }
        if self.spines.top {
            self.line(area, (f.x_min, f.y_min), (f.x_max, f.y_min), spine)?;
        }
        if self.spines.bottom {
            self.line(area, (f.x_min, f.y_max), (f.x_max, f.y_max), spine)?;
        }

        let major_len = self.scale.px(MAJOR_TICK_LENGTH);
        let minor_len = self.scale.px(MINOR_TICK_LENGTH);
        let major = self.stroke(MAJOR_TICK_WIDTH);
        let minor = self.stroke(MINOR_TICK_WIDTH);
        let tick_px = self.scale.px(TICK_LABEL_SIZE);
        let pad = self.scale.px(TICK_PAD);

        // x axis, ticks pointing out of the bottom spine
        let mut x_label_top = f.y_max + major_len + pad;
        for &x in &self.x_ticks.minor {
            self.line(area, (x, f.y_max), (x, f.y_max + minor_len), minor)?;
        }
        for (x, label) in &self.x_ticks.major {
            self.line(area, (*x, f.y_max), (*x, f.y_max + major_len), major)?;
            let text = Text::new(label, tick_px).anchor(Anchor::TOP_CENTER);
            let (_, h) = text.extent(area);
            text.draw(area, (x.round() as i32, (f.y_max + major_len + pad).round() as i32))?;
            x_label_top = x_label_top.max(f.y_max + major_len + pad + h);
        }

        // y axis, ticks pointing out of the left spine
        let mut y_label_right = f.x_min - major_len - pad;
        for &y in &self.y_ticks.minor {
            self.line(area, (f.x_min - minor_len, y), (f.x_min, y), minor)?;
        }
        for (y, label) in &self.y_ticks.major {
            self.line(area, (f.x_min - major_len, *y), (f.x_min, *y), major)?;
            let text = Text::new(label, tick_px).anchor(Anchor::RIGHT_CENTER);
            let (w, _) = text.extent(area);
            text.draw(area, ((f.x_min - major_len - pad).round() as i32, y.round() as i32))?;
            y_label_right = y_label_right.min(f.x_min - major_len - pad - w);
        }

        let (cx, cy) = f.center();
        if self.x_label.has_text() {
            let top = x_label_top + self.scale.px(LABEL_PAD);
            Text::new(self.x_label.label(), self.scale.px(self.x_label.size() as f64))
                .anchor(Anchor::TOP_CENTER)
                .draw(area, (cx.round() as i32, top.round() as i32))?;
        }
        if self.y_label.has_text() {
            let text = Text::new(self.y_label.label(), self.scale.px(self.y_label.size() as f64))
                .vertical();
            let (w, _) = text.footprint(area);
            let center_x = y_label_right - self.scale.px(LABEL_PAD) - w / 2.0;
            text.draw(area, (center_x.round() as i32, cy.round() as i32))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spines() {
        let open = Spines::open();
        assert!(open.left && open.bottom);
        assert!(!open.right && !open.top);
        assert_eq!(Spines::default(), Spines::all());
    }
}
