//! Markers without connecting lines.

use log::warn;

use super::cartesian::{extent, Cartesian, FrameSetup};
use super::{draw_titles, finish, render, series_marker, title_space, titles, ScatterOptions};
use crate::plotting::backend::Canvas;
use crate::plotting::element::{Legend, LegendEntry, LegendPosition};
use crate::plotting::error::PlotResult;
use crate::plotting::figure::Figure;
use crate::plotting::style::{Colormap, LineStyle};

const DEFAULT_SIZE: (f64, f64) = (7.0, 5.0);

/// Scatter y against x. Isolated series take their figure color and
/// marker; a figure without isolation values but with a color column maps
/// that column through `coolwarm` point by point.
pub fn scatter(fig: &Figure, options: &ScatterOptions) -> PlotResult<Canvas> {
    let ivals = fig.get_unique_ivals(false);
    let x_log = fig.x_axis().is_logscale();
    let y_log = fig.y_axis().is_logscale();
    let points = fig.get_xy_points(None);
    if points.is_empty() {
        warn!("no finite points to scatter");
    }
    let by_color = !fig.has_ivals() && !fig.get_cval_list(None).is_empty();
    let hidden = LineStyle::new().width(0.0);

    let canvas = render(fig, DEFAULT_SIZE, |root, scale| {
        let (title, subtitle) = titles(fig, scale, None);
        let setup = FrameSetup {
            x_extent: extent(points.iter().map(|p| p.0), x_log),
            y_extent: extent(points.iter().map(|p| p.1), y_log),
            top: title_space(root, scale, &title, &subtitle),
            ..FrameSetup::default()
        };
        let chart = Cartesian::build(root, fig.x_axis(), fig.y_axis(), scale, setup)?;
        let size = scale.px(options.markersize);
        let mut legend = Legend::new(LegendPosition::parse_or_default(&options.legend_loc));

        if by_color {
            let marker = fig.get_marker(None);
            let xs = fig.get_xval_list(None);
            let ys = fig.get_yval_list(None);
            let cs = fig.get_cval_list(None);
            let colored: Vec<((f64, f64), f64)> = xs
                .iter()
                .zip(ys)
                .zip(cs)
                .filter_map(|((x, y), c)| {
                    let x = x.as_f64()?;
                    (x.is_finite() && y.is_finite() && c.is_finite()).then_some(((x, y), c))
                })
                .collect();
            let values: Vec<f64> = colored.iter().map(|(_, c)| *c).collect();
            let colors = Colormap::Coolwarm.map_values(&values);
            for ((point, _), color) in colored.iter().zip(colors) {
                if let Some(style) = series_marker(marker, &color, size) {
                    chart.draw_series(root, &[*point], &hidden, Some(&style))?;
                }
            }
        } else {
            let mut styled = Vec::with_capacity(ivals.len());
            for ival in &ivals {
                let color = fig.get_color(ival);
                let marker = series_marker(fig.get_marker(Some(ival)), &color, size);
                if let Some(ref m) = marker {
                    legend.add_entry(LegendEntry::new(fig.get_label(ival)).marker_style(m.clone()));
                }
                styled.push((fig.get_xy_points(Some(ival)), marker));
            }
            for (series, marker) in styled.iter().rev() {
                chart.draw_series(root, series, &hidden, marker.as_ref())?;
            }
        }

        chart.axis_frame.draw(root)?;
        if chart.titles_fit() {
            draw_titles(root, scale, chart.frame(), &title, &subtitle)?;
        }
        legend.draw(root, chart.frame(), scale)?;
        Ok(())
    })?;

    finish(fig, &canvas, options.save, options.show)?;
    Ok(canvas)
}
