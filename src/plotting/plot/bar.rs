//! Bar charts of accumulated amounts per category.

use log::warn;
use plotters::style::ShapeStyle;

use super::cartesian::{Cartesian, FrameSetup};
use super::{accumulate, draw_titles, finish, render, title_space, titles, BarOptions};
use crate::plotting::backend::Canvas;
use crate::plotting::data::Value;
use crate::plotting::element::{Legend, LegendEntry, LegendPosition, Spines};
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::figure::Figure;
use crate::plotting::style::{cycle_color, Color};

const DEFAULT_SIZE: (f64, f64) = (8.0, 6.0);
/// Width of the bars of one category, in category spacings.
const BAR_WIDTH: f64 = 0.8;
/// Edge width in points.
const EDGE_WIDTH: f64 = 1.0;

/// One bar series: a color and an amount per category.
#[derive(Debug, Clone, PartialEq)]
struct BarSeries {
    label: String,
    color: Color,
    sums: Vec<f64>,
}

/// Horizontal span and vertical span of every bar, series by series.
fn layout(series: &[BarSeries], stack: bool) -> Vec<Vec<((f64, f64), (f64, f64))>> {
    let n = series.len().max(1) as f64;
    let mut bottoms = vec![0.0; series.first().map_or(0, |s| s.sums.len())];
    series
        .iter()
        .enumerate()
        .map(|(k, s)| {
            s.sums
                .iter()
                .enumerate()
                .map(|(i, amount)| {
                    let center = i as f64;
                    if stack {
                        let bottom = bottoms[i];
                        bottoms[i] += amount;
                        (
                            (center - BAR_WIDTH / 2.0, center + BAR_WIDTH / 2.0),
                            (bottom, bottom + amount),
                        )
                    } else {
                        let width = BAR_WIDTH / n;
                        let left = center - BAR_WIDTH / 2.0 + width * k as f64;
                        ((left, left + width), (0.0, *amount))
                    }
                })
                .collect()
        })
        .collect()
}

/// Bar chart of `|y|` summed per x category, one series per isolation
/// value. Series are stacked, or placed side by side when `stack` is off.
pub fn gen_bar_chart(fig: &Figure, options: &BarOptions) -> PlotResult<Canvas> {
    let categories = accumulate(
        &fig.get_xval_list(None),
        &fig.get_yval_list(None),
        options.xlabels.as_deref(),
    )
    .categories;
    if categories.is_empty() {
        warn!("no categories to draw in the bar chart");
        return Err(PlotError::EmptyData);
    }

    let series: Vec<BarSeries> = if fig.has_ivals() {
        fig.get_unique_ivals(false)
            .iter()
            .map(|ival| BarSeries {
                label: fig.get_label(ival),
                color: fig.get_color(ival),
                sums: series_sums(fig, Some(ival), &categories),
            })
            .collect()
    } else {
        vec![BarSeries {
            label: String::new(),
            color: cycle_color(0),
            sums: series_sums(fig, None, &categories),
        }]
    };
    let bars = layout(&series, options.stack);
    let top = bars
        .iter()
        .flatten()
        .map(|(_, (_, y))| *y)
        .fold(0.0, f64::max);

    let n = categories.len() as f64;
    let margin = 0.05 * (n - 1.0 + BAR_WIDTH);
    let x_range = (-BAR_WIDTH / 2.0 - margin, n - 1.0 + BAR_WIDTH / 2.0 + margin);
    let x_ticks: Vec<(f64, String)> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, c.clone()))
        .collect();

    let canvas = render(fig, DEFAULT_SIZE, |root, scale| {
        let (title, subtitle) = titles(fig, scale, None);
        let setup = FrameSetup {
            y_extent: Some((0.0, top)),
            x_categories: Some((x_range, x_ticks)),
            y_from_zero: true,
            spines: Spines::open(),
            top: title_space(root, scale, &title, &subtitle),
            ..FrameSetup::default()
        };
        let mut chart = Cartesian::build(root, fig.x_axis(), fig.y_axis(), scale, setup)?;
        let edge = ShapeStyle {
            color: Color::BLACK.to_plotters(),
            filled: false,
            stroke_width: scale.px(EDGE_WIDTH).round().max(1.0) as u32,
        };
        let mut legend = Legend::new(LegendPosition::parse_or_default(&options.legend_loc));
        for (s, spans) in series.iter().zip(&bars) {
            let fill = ShapeStyle {
                color: s.color.to_plotters(),
                filled: true,
                stroke_width: 0,
            };
            for (x, y) in spans {
                chart.draw_rect(*x, *y, fill)?;
                chart.draw_rect(*x, *y, edge)?;
            }
            legend.add_entry(LegendEntry::new(s.label.clone()).patch(s.color.clone()));
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

fn series_sums(fig: &Figure, ival: Option<&Value>, categories: &[String]) -> Vec<f64> {
    accumulate(
        &fig.get_xval_list(ival),
        &fig.get_yval_list(ival),
        Some(categories),
    )
    .sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::data::Dataset;
    use crate::plotting::figure::ColumnSelection;

    fn series(sums: &[&[f64]]) -> Vec<BarSeries> {
        sums.iter()
            .enumerate()
            .map(|(i, s)| BarSeries {
                label: i.to_string(),
                color: cycle_color(i),
                sums: s.to_vec(),
            })
            .collect()
    }

    #[test]
    fn test_stacked_layout() {
        let bars = layout(&series(&[&[1.0, 2.0], &[3.0, 4.0]]), true);
        let span = (1.0 - BAR_WIDTH / 2.0, 1.0 + BAR_WIDTH / 2.0);
        assert_eq!(bars[0][1], (span, (0.0, 2.0)));
        assert_eq!(bars[1][1], (span, (2.0, 6.0)));
    }

    #[test]
    fn test_grouped_layout() {
        let bars = layout(&series(&[&[1.0], &[3.0]]), false);
        assert_eq!(bars[0][0], ((-0.4, 0.0), (0.0, 1.0)));
        assert_eq!(bars[1][0], ((0.0, 0.4), (0.0, 3.0)));
    }

    fn figure() -> Figure {
        let data = Dataset::new()
            .with_column("month", ["jan", "jan", "feb", "feb", "mar"])
            .unwrap()
            .with_column("spent", [10.0, -5.0, 7.0, 3.0, 2.0])
            .unwrap()
            .with_column("who", ["a", "b", "a", "b", "a"])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&data, &ColumnSelection::new("month", "spent").isolate("who"))
            .unwrap();
        fig.set_dpi(Some(100));
        fig
    }

    #[test]
    fn test_bar_chart_stacks_series() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut fig = figure();
        fig.set_title_label(Some("Spending"), None);
        fig.set_yaxis_label("CHF", None);
        let options = BarOptions {
            save: false,
            ..BarOptions::default()
        };
        let canvas = gen_bar_chart(&fig, &options).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (800, 600));
        let has = |c: Color| canvas.pixels().chunks(3).any(|p| (p[0], p[1], p[2]) == c.to_rgb());
        assert!(has(cycle_color(0)));
        assert!(has(cycle_color(1)));
    }

    #[test]
    fn test_bar_chart_grouped_with_explicit_categories() {
        let fig = figure();
        let options = BarOptions {
            xlabels: Some(vec!["mar".to_string(), "jan".to_string()]),
            stack: false,
            save: false,
            ..BarOptions::default()
        };
        assert!(gen_bar_chart(&fig, &options).is_ok());
    }

    #[test]
    fn test_bar_chart_without_data_is_empty() {
        let options = BarOptions {
            save: false,
            ..BarOptions::default()
        };
        assert!(matches!(
            gen_bar_chart(&Figure::new(), &options),
            Err(PlotError::EmptyData)
        ));
    }
}
