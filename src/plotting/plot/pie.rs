//! Pie charts of accumulated amounts per category.

use std::f64::consts::TAU;

use log::{debug, warn};
use plotters::element::Polygon;
use plotters::style::ShapeStyle;

use super::{accumulate, draw_titles, finish, render, title_space, titles, PieOptions};
use crate::plotting::backend::{Canvas, Root};
use crate::plotting::element::text::{Anchor, Text};
use crate::plotting::element::{Bounds, Legend, LegendEntry, LegendPosition, PointScale};
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::figure::Figure;
use crate::plotting::style::{cycle_color, Color};

const DEFAULT_SIZE: (f64, f64) = (6.4, 4.8);
/// Slices at or below this amount are left out.
const MIN_SLICE: f64 = 0.01;
/// Axes box as fractions of the figure: left, right, bottom, top.
const AXES_BOX: (f64, f64, f64, f64) = (0.125, 0.9, 0.11, 0.88);
/// Wedge labels sit this far out, in radii.
const LABEL_DISTANCE: f64 = 1.1;
/// Font size of wedge labels, in points.
const LABEL_SIZE: f64 = 10.0;
/// Smallest pie radius kept clear of the titles, in pixels.
const MIN_RADIUS: f64 = 8.0;
/// Largest angle covered by one polygon edge.
const ARC_STEP: f64 = TAU / 360.0;

/// One wedge: angles in radians counterclockwise from 3 o'clock.
#[derive(Debug, Clone, PartialEq)]
struct Wedge {
    label: String,
    start: f64,
    end: f64,
    color: Color,
}

impl Wedge {
    fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Polygon outline in pixels, pushed out by `offset` pixels along the
    /// mid angle.
    fn outline(&self, center: (f64, f64), radius: f64, offset: f64) -> Vec<(i32, i32)> {
        let (cx, cy) = polar(center, offset, self.mid());
        let steps = ((self.end - self.start) / ARC_STEP).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push((cx.round() as i32, cy.round() as i32));
        for i in 0..=steps {
            let angle = self.start + (self.end - self.start) * i as f64 / steps as f64;
            let (x, y) = polar((cx, cy), radius, angle);
            points.push((x.round() as i32, y.round() as i32));
        }
        points
    }
}

/// Pixel position `distance` away from `center` at `angle`, y pointing down.
fn polar(center: (f64, f64), distance: f64, angle: f64) -> (f64, f64) {
    (
        center.0 + distance * angle.cos(),
        center.1 - distance * angle.sin(),
    )
}

fn amount_text(amount: f64, currency: Option<&str>) -> String {
    match currency {
        Some(curr) => format!("({:.2} {})", amount, curr),
        None => format!("({:.2})", amount),
    }
}

/// Subtitle showing the total, unless the figure has its own subtitle.
fn total_subtitle(fig: &Figure, total: f64, options: &PieOptions) -> Option<String> {
    (options.add_amount && !fig.has_subtitle_label())
        .then(|| amount_text(total, options.currency.as_deref()))
}

/// Slice labels and wedges, colored in category order.
fn wedges(categories: &[String], sums: &[f64], options: &PieOptions) -> Vec<Wedge> {
    let total: f64 = sums.iter().sum();
    let mut start = 0.0;
    categories
        .iter()
        .zip(sums)
        .enumerate()
        .map(|(i, (category, amount))| {
            let end = start + TAU * amount / total;
            let label = if options.add_amount {
                format!("{}\n{}", category, amount_text(*amount, options.currency.as_deref()))
            } else {
                category.clone()
            };
            let wedge = Wedge {
                label,
                start,
                end,
                color: cycle_color(i),
            };
            start = end;
            wedge
        })
        .collect()
}

/// Draw a possibly multi-line label with its lines stacked around `at`.
fn draw_label(root: &Root<'_>, text: &str, at: (f64, f64), anchor: Anchor, scale: PointScale) -> PlotResult<()> {
    let lines: Vec<&str> = text.lines().collect();
    let size = scale.px(LABEL_SIZE);
    let line_height = lines
        .iter()
        .map(|l| Text::new(l, size).extent(root).1)
        .fold(0.0, f64::max)
        .max(size);
    let top = at.1 - line_height * (lines.len() as f64 - 1.0) / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let y = top + line_height * i as f64;
        Text::new(line, size)
            .anchor(anchor)
            .draw(root, (at.0.round() as i32, y.round() as i32))?;
    }
    Ok(())
}

/// Pie chart of `|y|` summed per x category. Fails with
/// [`PlotError::EmptyData`] when no slice is large enough to draw.
pub fn gen_pie_chart(fig: &Figure, options: &PieOptions) -> PlotResult<Canvas> {
    let x = fig.get_xval_list(None);
    let y = fig.get_yval_list(None);
    let mut acc = accumulate(&x, &y, options.labels.as_deref());
    let before = acc.categories.len();
    acc.drop_small(MIN_SLICE);
    if acc.categories.len() < before {
        debug!("dropped {} slices at or below {}", before - acc.categories.len(), MIN_SLICE);
    }
    if acc.categories.is_empty() {
        warn!("nothing to draw in the pie chart");
        return Err(PlotError::EmptyData);
    }
    let slices = wedges(&acc.categories, &acc.sums, options);
    let subtitle = total_subtitle(fig, acc.total, options);
    let explode = options.explode.filter(|e| e.is_finite()).unwrap_or(0.0);

    let canvas = render(fig, DEFAULT_SIZE, |root, scale| {
        let (title, subtitle) = titles(fig, scale, subtitle);
        let (width, height) = root.dim_in_pixel();
        let (w, h) = (width as f64, height as f64);
        let (left, right, bottom, top) = AXES_BOX;
        let (frame_top, frame_bottom) = (h * (1.0 - top), h * (1.0 - bottom));
        let needed = title_space(root, scale, &title, &subtitle);
        let titles_fit = needed < frame_bottom - MIN_RADIUS * 2.0;
        if !titles_fit {
            warn!("titles do not fit a {}x{} px canvas, leaving them out", width, height);
        }
        let frame = Bounds::new(
            w * left,
            w * right,
            if titles_fit { frame_top.max(needed) } else { frame_top },
            frame_bottom,
        );
        let radius = frame.width().min(frame.height()) / 2.0 / LABEL_DISTANCE;
        let center = frame.center();

        for wedge in &slices {
            let style = ShapeStyle {
                color: wedge.color.to_plotters(),
                filled: true,
                stroke_width: 0,
            };
            root.draw(&Polygon::new(wedge.outline(center, radius, explode * radius), style))?;
        }

        if options.legend {
            let mut legend = Legend::new(LegendPosition::Anchored(0.075, 0.75));
            for wedge in &slices {
                legend.add_entry(LegendEntry::new(wedge.label.replace('\n', " ")).patch(wedge.color.clone()));
            }
            legend.draw(root, frame, scale)?;
        } else {
            for wedge in &slices {
                let mid = wedge.mid();
                let origin = polar(center, explode * radius, mid);
                let at = polar(origin, radius * LABEL_DISTANCE, mid);
                let anchor = if mid.cos() >= 0.0 {
                    Anchor::LEFT_CENTER
                } else {
                    Anchor::RIGHT_CENTER
                };
                draw_label(root, &wedge.label, at, anchor, scale)?;
            }
        }

        if titles_fit {
            draw_titles(root, scale, frame, &title, &subtitle)?;
        }
        Ok(())
    })?;

    finish(fig, &canvas, options.save, options.show)?;
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::data::Dataset;
    use crate::plotting::figure::ColumnSelection;
    use approx::assert_relative_eq;

    fn figure() -> Figure {
        let data = Dataset::new()
            .with_column("category", ["food", "rent", "food", "fun", "gift"])
            .unwrap()
            .with_column("amount", [-10.0, 500.0, -2.5, 40.0, 0.005])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&data, &ColumnSelection::new("category", "amount")).unwrap();
        fig.set_dpi(Some(100));
        fig
    }

    #[test]
    fn test_wedges_cover_the_circle() {
        let cats = vec!["a".to_string(), "b".to_string()];
        let options = PieOptions {
            add_amount: true,
            currency: Some("CHF".to_string()),
            ..PieOptions::default()
        };
        let slices = wedges(&cats, &[1.0, 3.0], &options);
        assert_relative_eq!(slices[0].end, TAU / 4.0);
        assert_relative_eq!(slices[1].end, TAU);
        assert_eq!(slices[1].label, "b\n(3.00 CHF)");
        assert_eq!(slices[1].color, cycle_color(1));
    }

    #[test]
    fn test_outline_starts_at_center() {
        let wedge = Wedge {
            label: String::new(),
            start: 0.0,
            end: TAU / 4.0,
            color: Color::BLACK,
        };
        let points = wedge.outline((100.0, 100.0), 50.0, 0.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (100, 50));
    }

    #[test]
    fn test_pie_chart_renders_large_slices() {
        let _ = env_logger::builder().is_test(true).try_init();
        let fig = figure();
        let options = PieOptions {
            save: false,
            ..PieOptions::default()
        };
        let canvas = gen_pie_chart(&fig, &options).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
        let has = |c: Color| canvas.pixels().chunks(3).any(|p| (p[0], p[1], p[2]) == c.to_rgb());
        assert!(has(cycle_color(0)));
        assert!(has(cycle_color(1)));
        assert!(has(cycle_color(2)));
        // "gift" is too small to get a slice.
        assert!(!has(cycle_color(3)));
    }

    #[test]
    fn test_pie_chart_with_wedge_labels_and_amounts() {
        let fig = figure();
        let options = PieOptions {
            legend: false,
            explode: None,
            add_amount: true,
            save: false,
            ..PieOptions::default()
        };
        assert!(gen_pie_chart(&fig, &options).is_ok());
    }

    #[test]
    fn test_total_becomes_subtitle() {
        let mut fig = figure();
        let options = PieOptions {
            add_amount: true,
            currency: Some("CHF".to_string()),
            ..PieOptions::default()
        };
        assert_eq!(
            total_subtitle(&fig, 527.5, &options).as_deref(),
            Some("(527.50 CHF)")
        );
        let plain = PieOptions {
            add_amount: false,
            ..PieOptions::default()
        };
        assert_eq!(total_subtitle(&fig, 527.5, &plain), None);
        fig.set_subtitle_label(Some("May"), None);
        assert_eq!(total_subtitle(&fig, 527.5, &options), None);
    }

    #[test]
    fn test_pie_chart_survives_huge_title() {
        let mut fig = figure();
        fig.set_title_label(Some("Budget"), Some(100_000));
        let options = PieOptions {
            save: false,
            ..PieOptions::default()
        };
        let canvas = gen_pie_chart(&fig, &options).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
    }

    #[test]
    fn test_pie_chart_without_data_is_empty() {
        let options = PieOptions {
            save: false,
            ..PieOptions::default()
        };
        assert!(matches!(
            gen_pie_chart(&Figure::new(), &options),
            Err(PlotError::EmptyData)
        ));
    }
}
