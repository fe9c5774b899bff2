//! Lines and markers per isolation value, with optional fit curves.

use log::{debug, warn};

use super::cartesian::{extent, Cartesian, FrameSetup};
use super::{draw_titles, finish, render, series_marker, title_space, titles, PlotOptions};
use crate::plotting::backend::Canvas;
use crate::plotting::data::Value;
use crate::plotting::element::{Legend, LegendEntry, LegendPosition};
use crate::plotting::error::PlotResult;
use crate::plotting::figure::Figure;
use crate::plotting::fit::Fit;
use crate::plotting::style::LineStyle;

/// Default figure size in inches.
const DEFAULT_SIZE: (f64, f64) = (6.4, 4.8);
/// Points at which each fit is evaluated.
const FIT_POINTS: usize = 100;

/// Plot y against x for every isolation value, then draw each fit across
/// the visible x range. Earlier isolation values and fits end up on top.
pub fn gen_plot(fig: &Figure, options: &PlotOptions, fits: &[Fit]) -> PlotResult<Canvas> {
    let series: Vec<(Value, Vec<(f64, f64)>)> = fig
        .get_unique_ivals(false)
        .into_iter()
        .map(|ival| {
            let points = fig.get_xy_points(Some(&ival));
            (ival, points)
        })
        .collect();
    if series.iter().all(|(_, points)| points.is_empty()) {
        warn!("no finite points to plot");
    }
    let x_log = fig.x_axis().is_logscale();
    let y_log = fig.y_axis().is_logscale();
    let all_points = || series.iter().flat_map(|(_, points)| points.iter().copied());

    let canvas = render(fig, DEFAULT_SIZE, |root, scale| {
        let (title, subtitle) = titles(fig, scale, None);
        let setup = FrameSetup {
            x_extent: extent(all_points().map(|p| p.0), x_log),
            y_extent: extent(all_points().map(|p| p.1), y_log),
            top: title_space(root, scale, &title, &subtitle),
            ..FrameSetup::default()
        };
        let chart = Cartesian::build(root, fig.x_axis(), fig.y_axis(), scale, setup)?;

        let mut legend = Legend::new(LegendPosition::parse_or_default(&options.legend_loc));
        let mut styled = Vec::with_capacity(series.len());
        for (ival, points) in &series {
            let color = fig.get_color(ival);
            let line = LineStyle::new()
                .color(color.clone())
                .width(scale.px(options.linewidth));
            let marker = series_marker(
                fig.get_marker(Some(ival)),
                &color,
                scale.px(options.markersize),
            );
            let mut entry = LegendEntry::new(fig.get_label(ival));
            if line.is_visible() {
                entry = entry.line_style(line.clone());
            }
            if let Some(ref m) = marker {
                entry = entry.marker_style(m.clone());
            }
            legend.add_entry(entry);
            styled.push((points, line, marker));
        }
        for (points, line, marker) in styled.iter().rev() {
            chart.draw_series(root, points, line, marker.as_ref())?;
        }

        let x_limits = chart.x_limits();
        debug!("evaluating {} fits over x {:?}", fits.len(), x_limits);
        let mut fit_series = Vec::with_capacity(fits.len());
        for fit in fits {
            let xs = fit.get_xval_list(x_limits, FIT_POINTS, chart.x_is_log());
            let points: Vec<(f64, f64)> = xs.iter().map(|x| (*x, fit.eval(*x))).collect();
            let color = fit.get_color().clone();
            let line = LineStyle::new()
                .color(color.clone())
                .width(scale.px(fit.get_linewidth()))
                .dash(fit.get_dash().clone());
            let marker = series_marker(fit.get_marker(), &color, scale.px(fit.get_markersize()));
            let mut entry = LegendEntry::new(fit.get_label().label());
            if line.is_visible() {
                entry = entry.line_style(line.clone());
            }
            if let Some(ref m) = marker {
                entry = entry.marker_style(m.clone());
            }
            legend.add_entry(entry);
            fit_series.push((points, line, marker));
        }
        for (points, line, marker) in fit_series.iter().rev() {
            chart.draw_series(root, points, line, marker.as_ref())?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::data::Dataset;
    use crate::plotting::figure::ColumnSelection;
    use crate::plotting::style::{cycle_color, Color};

    fn count(canvas: &Canvas, rgb: (u8, u8, u8)) -> usize {
        canvas
            .pixels()
            .chunks(3)
            .filter(|p| (p[0], p[1], p[2]) == rgb)
            .count()
    }

    fn figure() -> Figure {
        let data = Dataset::new()
            .with_column("period", [1.0, 10.0, 100.0, 1.0, 10.0, 100.0])
            .unwrap()
            .with_column("10", [2.0, 3.0, 4.0, 1.0, 1.5, 2.0])
            .unwrap()
            .with_column("perm", [0.001, 0.001, 0.001, 0.01, 0.01, 0.01])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&data, &ColumnSelection::new("period", "10").isolate("perm"))
            .unwrap();
        fig.set_dpi(Some(100));
        fig
    }

    #[test]
    fn test_gen_plot_draws_each_series() {
        let fig = figure();
        let options = PlotOptions {
            save: false,
            ..PlotOptions::default()
        };
        let canvas = gen_plot(&fig, &options, &[]).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
        assert!(count(&canvas, cycle_color(0).to_rgb()) > 0);
        assert!(count(&canvas, cycle_color(1).to_rgb()) > 0);
    }

    #[test]
    fn test_gen_plot_with_fit_on_log_axes() {
        let mut fig = figure();
        fig.set_logscale(None, true, true);
        fig.set_title_label(Some("Relaxation"), None);
        let fit = Fit::power_law(2.0, 0.1, "fit").color(Color::RED);
        let options = PlotOptions {
            save: false,
            ..PlotOptions::default()
        };
        let canvas = gen_plot(&fig, &options, &[fit]).unwrap();
        assert!(count(&canvas, Color::RED.to_rgb()) > 0);
    }

    #[test]
    fn test_gen_plot_saves_to_figure_path() {
        let mut fig = figure();
        let dir = std::env::temp_dir().join(format!("plotfig-line-{}", std::process::id()));
        fig.set_saveas(dir.to_str().unwrap(), "lines", ".png");
        fig.set_size_inches(3.0, 2.0);
        let canvas = gen_plot(&fig, &PlotOptions::default(), &[]).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (300, 200));
        let saved = image::open(fig.get_saveas()).unwrap();
        assert_eq!((saved.width(), saved.height()), (300, 200));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_gen_plot_leaves_out_oversized_labels() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut fig = figure();
        fig.set_title_label(Some("Big"), Some(100_000));
        fig.set_xaxis_label("Period", Some(100_000));
        let options = PlotOptions {
            save: false,
            ..PlotOptions::default()
        };
        let canvas = gen_plot(&fig, &options, &[]).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
        assert!(count(&canvas, cycle_color(0).to_rgb()) > 0);
    }

    #[test]
    fn test_gen_plot_without_data_renders_empty_axes() {
        let fig = Figure::new();
        let options = PlotOptions {
            save: false,
            ..PlotOptions::default()
        };
        assert!(gen_plot(&fig, &options, &[]).is_ok());
    }
}
