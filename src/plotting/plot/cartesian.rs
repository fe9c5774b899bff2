//! Shared layout for charts with an x and a y axis.
//!
//! Ranges are resolved in display space (log-transformed on log axes) and
//! handed to plotters' `ChartBuilder`, which owns the data-to-pixel mapping.
//! Series, ticks and labels are then drawn in pixel space on the root area.

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::Rectangle;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::{Cartesian2d, ChartBuilder, ChartContext, DrawingBackend};
use plotters::style::ShapeStyle;

use crate::plotting::axis::{Axis, DEFAULT_PADDING_VALUE};
use crate::plotting::element::text::Text;
use crate::plotting::element::{AxisFrame, Bounds, PointScale, Spines, TickSet, TICK_LABEL_SIZE};
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::label::Label;
use crate::plotting::scale::{self, AxisMap};
use crate::plotting::style::{LineStyle, MarkerStyle};

/// Space kept free at the canvas edges, in points.
const EDGE_PAD: f64 = 6.0;
/// Smallest plot frame worth drawing, in pixels.
const MIN_FRAME: f64 = 16.0;
/// Target number of automatic linear ticks.
const AUTO_TICKS: usize = 6;

/// What a chart needs from its caller besides the figure's axes.
#[derive(Debug, Clone, Default)]
pub(super) struct FrameSetup {
    /// Data extent along x, used when the axis has no limits
    pub x_extent: Option<(f64, f64)>,
    pub y_extent: Option<(f64, f64)>,
    /// Fixed display range and labelled positions for a categorical x axis
    pub x_categories: Option<((f64, f64), Vec<(f64, String)>)>,
    /// Keep a zero lower bound of the y extent unpadded
    pub y_from_zero: bool,
    pub spines: Spines,
    /// Pixels reserved above the frame
    pub top: f64,
}

/// A laid-out chart: coordinate mapping plus the decorations to draw once
/// the series are in place.
pub(super) struct Cartesian<'a, DB: DrawingBackend> {
    chart: ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_map: AxisMap,
    y_map: AxisMap,
    x_range: (f64, f64),
    y_range: (f64, f64),
    titles_fit: bool,
    pub axis_frame: AxisFrame,
}

impl<'a, DB: DrawingBackend> Cartesian<'a, DB> {
    pub fn build(
        root: &'a DrawingArea<DB, Shift>,
        x_axis: &Axis,
        y_axis: &Axis,
        scale: PointScale,
        setup: FrameSetup,
    ) -> PlotResult<Self> {
        let x_map = AxisMap::new(x_axis.scale());
        let y_map = AxisMap::new(y_axis.scale());
        let categorical = setup.x_categories.is_some();
        let (x_range, x_major, x_minor) = match setup.x_categories {
            Some((range, ticks)) => (range, ticks, Vec::new()),
            None => {
                let range = resolve_range(x_axis, &x_map, setup.x_extent, false);
                let (major, minor) = tick_values(x_axis, &x_map, range);
                (range, labelled(x_axis, &major), minor)
            }
        };
        let y_range = resolve_range(y_axis, &y_map, setup.y_extent, setup.y_from_zero);
        let (y_major, y_minor) = tick_values(y_axis, &y_map, y_range);
        let y_major = labelled(y_axis, &y_major);

        let placeholder = |ticks: &[(f64, String)]| TickSet {
            major: ticks.iter().map(|(_, l)| (0.0, l.clone())).collect(),
            minor: Vec::new(),
        };
        let pad = scale.px(EDGE_PAD);
        let last_x_half = x_major
            .last()
            .map(|(_, l)| Text::new(l, scale.px(TICK_LABEL_SIZE)).extent(root).0 / 2.0)
            .unwrap_or(0.0);
        let right = pad.max(last_x_half + pad / 2.0);
        let (width, height) = root.dim_in_pixel();
        let margins = |x_label: &Label, y_label: &Label, top: f64| {
            let left = AxisFrame::left_extent(&placeholder(&y_major), y_label, scale, root) + pad;
            let bottom = AxisFrame::bottom_extent(&placeholder(&x_major), x_label, scale, root) + pad;
            let fits = width as f64 - left - right >= MIN_FRAME
                && height as f64 - top - bottom >= MIN_FRAME;
            (left, bottom, top.max(pad), fits)
        };

        let mut x_label = x_axis.label();
        let mut y_label = y_axis.label();
        let (mut left, mut bottom, mut top, titles_fit) = margins(&x_label, &y_label, setup.top);
        if !titles_fit {
            warn!(
                "titles and axis labels do not fit a {}x{} px canvas, leaving them out",
                width, height
            );
            x_label = Label::new(Some(""), None);
            y_label = Label::new(Some(""), None);
            let (l, b, t, fits) = margins(&x_label, &y_label, 0.0);
            if !fits {
                return Err(PlotError::InvalidConfig(format!(
                    "a {}x{} px canvas is too small for the axis labels",
                    width, height
                )));
            }
            (left, bottom, top) = (l, b, t);
        }
        debug!(
            "frame margins left {:.0} right {:.0} top {:.0} bottom {:.0}",
            left, right, top, bottom
        );

        let chart = ChartBuilder::on(root)
            .margin_left(left.round() as u32)
            .margin_right(right.round() as u32)
            .margin_top(top.round() as u32)
            .margin_bottom(bottom.round() as u32)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        let (x0, y0) = chart.backend_coord(&(x_range.0, y_range.0));
        let (x1, y1) = chart.backend_coord(&(x_range.1, y_range.1));
        let frame = Bounds::from_points(x0 as f64, y0 as f64, x1 as f64, y1 as f64);

        let x_px = |v: f64| chart.backend_coord(&(v, y_range.0)).0 as f64;
        let y_px = |v: f64| chart.backend_coord(&(x_range.0, v)).1 as f64;
        let display = |map: &AxisMap, v: f64| map.forward(v);
        let x_ticks = TickSet {
            major: if categorical {
                x_major.iter().map(|(v, l)| (x_px(*v), l.clone())).collect()
            } else {
                x_major
                    .iter()
                    .filter_map(|(v, l)| display(&x_map, *v).map(|d| (x_px(d), l.clone())))
                    .collect()
            },
            minor: x_minor
                .iter()
                .filter_map(|v| display(&x_map, *v).map(x_px))
                .collect(),
        };
        let y_ticks = TickSet {
            major: y_major
                .iter()
                .filter_map(|(v, l)| display(&y_map, *v).map(|d| (y_px(d), l.clone())))
                .collect(),
            minor: y_minor
                .iter()
                .filter_map(|v| display(&y_map, *v).map(y_px))
                .collect(),
        };

        let axis_frame = AxisFrame {
            frame,
            x_ticks,
            y_ticks,
            x_label,
            y_label,
            spines: setup.spines,
            scale,
        };
        Ok(Cartesian {
            chart,
            x_map,
            y_map,
            x_range,
            y_range,
            titles_fit,
            axis_frame,
        })
    }

    pub fn frame(&self) -> Bounds {
        self.axis_frame.frame
    }

    /// False when the titles were left out of the layout for lack of room.
    pub fn titles_fit(&self) -> bool {
        self.titles_fit
    }

    /// Data x range currently shown, in data units.
    pub fn x_limits(&self) -> (f64, f64) {
        (
            self.x_map.inverse(self.x_range.0),
            self.x_map.inverse(self.x_range.1),
        )
    }

    pub fn x_is_log(&self) -> bool {
        self.x_map.is_log()
    }

    /// Pixel position of a data point, if it has one on these axes.
    pub fn pixel(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        let dx = self.x_map.forward(x)?;
        let dy = self.y_map.forward(y)?;
        let (px, py) = self.chart.backend_coord(&(dx, dy));
        Some((px as f64, py as f64))
    }

    /// Draw a series clipped to the frame: the line first, markers on top.
    pub fn draw_series(
        &self,
        root: &DrawingArea<DB, Shift>,
        points: &[(f64, f64)],
        line: &LineStyle,
        marker: Option<&MarkerStyle>,
    ) -> PlotResult<()> {
        let pixels: Vec<Option<(f64, f64)>> = points.iter().map(|p| self.pixel(*p)).collect();
        let frame = self.frame();
        if line.is_visible() {
            for run in clip_polyline(&pixels, frame) {
                line.draw_polyline(root, &run)?;
            }
        }
        if let Some(marker) = marker {
            for (x, y) in pixels.into_iter().flatten() {
                if frame.contains(x, y) {
                    marker.draw_at(root, (x.round() as i32, y.round() as i32))?;
                }
            }
        }
        Ok(())
    }

    /// Fill a rectangle given in data coordinates. y bounds without a
    /// position on a log axis are pinned to the bottom of the frame.
    pub fn draw_rect(&mut self, x: (f64, f64), y: (f64, f64), style: ShapeStyle) -> PlotResult<()> {
        let bottom = self.y_range.0;
        let y0 = self.y_map.forward(y.0).unwrap_or(bottom);
        let y1 = self.y_map.forward(y.1).unwrap_or(bottom);
        let clamp = |v: f64| v.clamp(self.y_range.0, self.y_range.1);
        let (x0, x1) = (
            x.0.clamp(self.x_range.0, self.x_range.1),
            x.1.clamp(self.x_range.0, self.x_range.1),
        );
        let (y0, y1) = (clamp(y0), clamp(y1));
        self.chart
            .draw_series(std::iter::once(Rectangle::new([(x0, y0), (x1, y1)], style)))?;
        Ok(())
    }
}

/// Smallest and largest finite value, ignoring non-positive values when
/// `positive_only` is set.
pub(super) fn extent(values: impl IntoIterator<Item = f64>, positive_only: bool) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite() && (!positive_only || *v > 0.0))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Display range of an axis: its limits where set, otherwise the data
/// extent padded by the default margin.
fn resolve_range(
    axis: &Axis,
    map: &AxisMap,
    extent: Option<(f64, f64)>,
    from_zero: bool,
) -> (f64, f64) {
    let padded = extent.map(|(lo, hi)| match axis.logscale_base() {
        Some(base) => scale::pad_log_range(lo, hi, base, DEFAULT_PADDING_VALUE),
        None => {
            let (plo, phi) = scale::pad_range(lo, hi, DEFAULT_PADDING_VALUE);
            if from_zero && lo == 0.0 {
                (0.0, phi)
            } else {
                (plo, phi)
            }
        }
    });
    let fallback = if map.is_log() { (1.0, 10.0) } else { (0.0, 1.0) };
    let (dlo, dhi) = padded.unwrap_or(fallback);
    let lo = axis.minimum().unwrap_or(dlo);
    let hi = axis.maximum().unwrap_or(dhi);
    map.display_range(lo, hi)
        .or_else(|| map.display_range(dlo, dhi))
        .or_else(|| map.display_range(fallback.0, fallback.1))
        .unwrap_or((0.0, 1.0))
}

/// Major and minor tick values in data units inside a display range.
/// Explicit axis ticks win; otherwise linear axes get round-numbered ticks
/// and log axes get powers of the base.
fn tick_values(axis: &Axis, map: &AxisMap, range: (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let (lo, hi) = (map.inverse(range.0), map.inverse(range.1));
    let major = match (axis.major_ticks(), axis.logscale_base()) {
        (Some(ticks), _) => ticks.to_vec(),
        (None, Some(base)) => {
            let ticks = scale::log_ticks(lo, hi, base);
            if ticks.len() >= 2 {
                ticks
            } else {
                scale::nice_ticks(lo, hi, AUTO_TICKS)
            }
        }
        (None, None) => scale::nice_ticks(lo, hi, AUTO_TICKS),
    };
    let minor = match (axis.minor_ticks(), axis.logscale_base()) {
        (Some(ticks), _) => ticks.to_vec(),
        (None, Some(base)) if !axis.has_major_ticks() => scale::log_minor_ticks(lo, hi, base),
        _ => Vec::new(),
    };

    let span = (range.1 - range.0).abs();
    let inside = |v: &f64| {
        map.forward(*v)
            .is_some_and(|d| d >= range.0 - span * 1e-9 && d <= range.1 + span * 1e-9)
    };
    (
        major.into_iter().filter(inside).collect(),
        minor.into_iter().filter(inside).collect(),
    )
}

fn labelled(axis: &Axis, values: &[f64]) -> Vec<(f64, String)> {
    values.iter().map(|v| (*v, axis.format_tick(*v))).collect()
}

/// Clip segment `a`-`b` to the frame (Liang-Barsky).
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    frame: Bounds,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, a.0 - frame.x_min),
        (dx, frame.x_max - a.0),
        (-dy, a.1 - frame.y_min),
        (dy, frame.y_max - a.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| (a.0 + dx * t, a.1 + dy * t);
    Some((at(t0), at(t1)))
}

/// Split a pixel polyline into runs that stay inside the frame. Points
/// without a position break the line.
fn clip_polyline(points: &[Option<(f64, f64)>], frame: Bounds) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut flush = |current: &mut Vec<(f64, f64)>| {
        if current.len() >= 2 {
            runs.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for pair in points.windows(2) {
        let clipped = match (pair[0], pair[1]) {
            (Some(a), Some(b)) => clip_segment(a, b, frame),
            _ => None,
        };
        match clipped {
            Some((p, q)) => {
                if current.last() != Some(&p) {
                    flush(&mut current);
                    current.push(p);
                }
                current.push(q);
            }
            None => flush(&mut current),
        }
    }
    flush(&mut current);
    runs
}
