//! One-shot chart rendering.
//!
//! Every function reads the figure, renders a fresh canvas, then saves and
//! shows it as requested. Nothing is retained between calls.

mod bar;
mod cartesian;
mod line;
mod pie;
mod scatter;

pub use bar::gen_bar_chart;
pub use line::gen_plot;
pub use pie::gen_pie_chart;
pub use scatter::scatter;

use indexmap::IndexMap;
use log::debug;

use crate::plotting::backend::{viewer, Canvas, Root};
use crate::plotting::data::Value;
use crate::plotting::element::text::{init_font, Anchor, Text};
use crate::plotting::element::{Bounds, PointScale};
use crate::plotting::error::PlotResult;
use crate::plotting::figure::Figure;
use crate::plotting::style::{Color, Marker, MarkerStyle};

/// Gap around titles, in points.
const TITLE_PAD: f64 = 6.0;

/// Options for [`gen_plot`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Line width in points; 0 draws markers only
    pub linewidth: f64,
    /// Marker size in points
    pub markersize: f64,
    /// Matplotlib legend location, e.g. `"lower center"`
    pub legend_loc: String,
    pub show: bool,
    pub save: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            linewidth: 2.0,
            markersize: 2.0,
            legend_loc: "best".to_string(),
            show: false,
            save: true,
        }
    }
}

/// Options for [`scatter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterOptions {
    /// Marker size in points
    pub markersize: f64,
    pub legend_loc: String,
    pub show: bool,
    pub save: bool,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        ScatterOptions {
            markersize: 6.0,
            legend_loc: "best".to_string(),
            show: false,
            save: true,
        }
    }
}

/// Options for [`gen_pie_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct PieOptions {
    /// Categories to show, in order; the unique x values when `None`
    pub labels: Option<Vec<String>>,
    /// Name slices in a legend instead of next to the wedges
    pub legend: bool,
    /// Radial offset of every wedge as a fraction of the radius
    pub explode: Option<f64>,
    /// Append each slice's amount to its label
    pub add_amount: bool,
    /// Currency printed after amounts
    pub currency: Option<String>,
    pub show: bool,
    pub save: bool,
}

impl Default for PieOptions {
    fn default() -> Self {
        PieOptions {
            labels: None,
            legend: true,
            explode: Some(0.05),
            add_amount: false,
            currency: None,
            show: false,
            save: true,
        }
    }
}

/// Options for [`gen_bar_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    /// Categories to show, in order; the unique x values when `None`
    pub xlabels: Option<Vec<String>>,
    /// Stack the bars of each isolation value; side by side otherwise
    pub stack: bool,
    pub legend_loc: String,
    pub show: bool,
    pub save: bool,
}

impl Default for BarOptions {
    fn default() -> Self {
        BarOptions {
            xlabels: None,
            stack: true,
            legend_loc: "best".to_string(),
            show: false,
            save: true,
        }
    }
}

/// Per-category sums of `|y|`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub categories: Vec<String>,
    pub sums: Vec<f64>,
    /// Sum over all matched rows
    pub total: f64,
}

impl Accumulation {
    /// Drop categories whose sum is at most `threshold`. The total is kept.
    pub fn drop_small(&mut self, threshold: f64) {
        let (categories, sums): (Vec<String>, Vec<f64>) = self
            .categories
            .drain(..)
            .zip(self.sums.drain(..))
            .filter(|(_, s)| *s > threshold)
            .unzip();
        self.categories = categories;
        self.sums = sums;
    }
}

/// Sum `|y|` per x category. Categories are matched on their display
/// string; rows whose x is not among `categories`, or whose y is not a
/// number, are skipped. Without explicit categories the unique x values
/// are used in order of first appearance.
pub fn accumulate(x: &[Value], y: &[f64], categories: Option<&[String]>) -> Accumulation {
    let mut sums: IndexMap<String, f64> = match categories {
        Some(cats) => cats.iter().map(|c| (c.clone(), 0.0)).collect(),
        None => x.iter().map(|v| (v.to_string(), 0.0)).collect(),
    };
    let mut total = 0.0;
    for (xv, yv) in x.iter().zip(y) {
        if !yv.is_finite() {
            continue;
        }
        if let Some(sum) = sums.get_mut(&xv.to_string()) {
            *sum += yv.abs();
            total += yv.abs();
        }
    }
    let (categories, sums): (Vec<String>, Vec<f64>) = sums.into_iter().unzip();
    Accumulation {
        categories,
        sums,
        total,
    }
}

/// Render a canvas at the figure's resolution and size, or at
/// `default_size` inches when the figure has none.
fn render<F>(fig: &Figure, default_size: (f64, f64), draw: F) -> PlotResult<Canvas>
where
    F: FnOnce(&Root<'_>, PointScale) -> PlotResult<()>,
{
    init_font(fig.font_path());
    let scale = PointScale::new(fig.get_dpi());
    let (w, h) = fig.size_inches().unwrap_or(default_size);
    let (width, height) = (scale.inches(w), scale.inches(h));
    debug!("rendering {}x{} px at {} dpi", width, height, fig.get_dpi());
    Canvas::render(width, height, |root| draw(root, scale))
}

/// Save and/or show a rendered canvas.
fn finish(fig: &Figure, canvas: &Canvas, save: bool, show: bool) -> PlotResult<()> {
    if save {
        canvas.save(&fig.get_saveas(), fig.file_type())?;
    }
    if show {
        let title = if fig.has_title_label() {
            fig.title_label().label()
        } else {
            "plotfig"
        };
        viewer::show(canvas, title)?;
    }
    Ok(())
}

/// Filled marker of `size` pixels, or `None` for [`Marker::None`].
fn series_marker(marker: Marker, color: &Color, size: f64) -> Option<MarkerStyle> {
    (marker != Marker::None).then(|| {
        MarkerStyle::new(marker)
            .size(size)
            .fill(color.clone())
            .edge_color(color.clone())
    })
}

/// Title text and subtitle text, in that order, with their font sizes in
/// pixels. Empty strings are left out.
fn titles(fig: &Figure, scale: PointScale, subtitle: Option<String>) -> (Option<Text>, Option<Text>) {
    let title = fig.title_label();
    let title = title
        .has_text()
        .then(|| Text::new(title.label(), scale.px(title.size() as f64)).anchor(Anchor::TOP_CENTER));
    let sub_label = fig.subtitle_label();
    let sub_text = subtitle.unwrap_or_else(|| sub_label.label().to_string());
    let subtitle = (!sub_text.is_empty()).then(|| {
        Text::new(&sub_text, scale.px(sub_label.size() as f64)).anchor(Anchor::BOTTOM_CENTER)
    });
    (title, subtitle)
}

/// Pixels needed above the plot frame for the titles.
fn title_space(
    root: &Root<'_>,
    scale: PointScale,
    title: &Option<Text>,
    subtitle: &Option<Text>,
) -> f64 {
    let pad = scale.px(TITLE_PAD);
    let mut space = pad;
    if let Some(t) = title {
        space += t.extent(root).1 + pad;
    }
    if let Some(t) = subtitle {
        space += t.extent(root).1 + pad;
    }
    space
}

/// Draw the title centered at the top of the canvas and the subtitle
/// centered above `frame`.
fn draw_titles(
    root: &Root<'_>,
    scale: PointScale,
    frame: Bounds,
    title: &Option<Text>,
    subtitle: &Option<Text>,
) -> PlotResult<()> {
    let pad = scale.px(TITLE_PAD);
    if let Some(t) = title {
        let (width, _) = root.dim_in_pixel();
        t.draw(root, ((width / 2) as i32, pad.round() as i32))?;
    }
    if let Some(t) = subtitle {
        let (cx, _) = frame.center();
        t.draw(root, (cx.round() as i32, (frame.y_min - pad).round() as i32))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_sums_absolute_values() {
        let x: Vec<Value> = ["food", "rent", "food", "fun"].into_iter().map(Value::from).collect();
        let y = [-10.0, 500.0, 2.5, f64::NAN];
        let acc = accumulate(&x, &y, None);
        assert_eq!(acc.categories, vec!["food", "rent", "fun"]);
        assert_eq!(acc.sums, vec![12.5, 500.0, 0.0]);
        assert_eq!(acc.total, 512.5);
    }

    #[test]
    fn test_accumulate_with_categories() {
        let x: Vec<Value> = vec![Value::from(1), Value::from(2), Value::from("c")];
        let y = [1.0, 2.0, 3.0];
        let cats = vec!["2".to_string(), "c".to_string(), "z".to_string()];
        let mut acc = accumulate(&x, &y, Some(&cats));
        assert_eq!(acc.sums, vec![2.0, 3.0, 0.0]);
        assert_eq!(acc.total, 5.0);

        acc.drop_small(0.01);
        assert_eq!(acc.categories, vec!["2", "c"]);
        assert_eq!(acc.total, 5.0);
    }

    #[test]
    fn test_option_defaults() {
        let plot = PlotOptions::default();
        assert_eq!(plot.linewidth, 2.0);
        assert_eq!(plot.markersize, 2.0);
        assert!(plot.save && !plot.show);
        assert_eq!(ScatterOptions::default().markersize, 6.0);
        assert_eq!(PieOptions::default().explode, Some(0.05));
        assert!(BarOptions::default().stack);
    }
}
