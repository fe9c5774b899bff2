//! Model curves drawn over line plots.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::plotting::label::Label;
use crate::plotting::style::{Color, DashPattern, Marker};

/// A function of x drawn as an extra series, evaluated across the plotted
/// x range.
#[derive(Clone)]
pub struct Fit {
    function: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    label: Label,
    /// Line width in points
    linewidth: f64,
    dash: DashPattern,
    color: Color,
    marker: Marker,
    /// Marker size in points
    markersize: f64,
}

impl Fit {
    pub fn new<F>(function: F, label: &str) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Fit {
            function: Arc::new(function),
            label: Label::new(Some(label), None),
            linewidth: 1.5,
            dash: DashPattern::Dashed,
            color: Color::BLACK,
            marker: Marker::None,
            markersize: 2.0,
        }
    }

    /// `y = slope * x + intercept`
    pub fn linear(slope: f64, intercept: f64, label: &str) -> Self {
        Fit::new(move |x| slope * x + intercept, label)
    }

    /// `y = prefactor * x^exponent`
    pub fn power_law(prefactor: f64, exponent: f64, label: &str) -> Self {
        Fit::new(move |x| prefactor * x.powf(exponent), label)
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.linewidth = width;
        self
    }

    pub fn dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn markersize(mut self, size: f64) -> Self {
        self.markersize = size;
        self
    }

    pub fn get_label(&self) -> &Label {
        &self.label
    }

    pub fn get_linewidth(&self) -> f64 {
        self.linewidth
    }

    pub fn get_dash(&self) -> &DashPattern {
        &self.dash
    }

    pub fn get_color(&self) -> &Color {
        &self.color
    }

    pub fn get_marker(&self) -> Marker {
        self.marker
    }

    pub fn get_markersize(&self) -> f64 {
        self.markersize
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// `n` x values spanning `lims`, geometrically spaced when `log` is set.
    /// A log spacing needs positive limits and falls back to linear.
    pub fn get_xval_list(&self, lims: (f64, f64), n: usize, log: bool) -> Vec<f64> {
        let (lo, hi) = lims;
        match n {
            0 => return Vec::new(),
            1 => return vec![lo],
            _ => {}
        }
        let last = (n - 1) as f64;
        if log {
            if lo > 0.0 && hi > 0.0 {
                let (a, b) = (lo.ln(), hi.ln());
                return (0..n)
                    .map(|i| (a + (b - a) * i as f64 / last).exp())
                    .collect();
            }
            warn!(
                "fit limits ({}, {}) are not positive, spacing x values linearly",
                lo, hi
            );
        }
        (0..n).map(|i| lo + (hi - lo) * i as f64 / last).collect()
    }

    /// The function evaluated at [`Fit::get_xval_list`].
    pub fn get_yval_list(&self, lims: (f64, f64), n: usize, log: bool) -> Vec<f64> {
        self.get_xval_list(lims, n, log)
            .into_iter()
            .map(|x| self.eval(x))
            .collect()
    }
}

impl fmt::Debug for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fit")
            .field("label", &self.label)
            .field("linewidth", &self.linewidth)
            .field("dash", &self.dash)
            .field("color", &self.color)
            .field("marker", &self.marker)
            .finish()
    }
}
