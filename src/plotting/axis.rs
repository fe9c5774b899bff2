//! One figure axis: label, limits, scale and tick marks.

use std::fmt;

use log::warn;

use crate::plotting::data::Value;
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::label::{format_template, Label};
use crate::plotting::scale;

pub const DEFAULT_NUMBER_MAJOR_TICKS: usize = 3;
pub const DEFAULT_NUMBER_MINOR_TICKS: usize = 4;
pub const DEFAULT_PADDING_VALUE: f64 = 0.05;
pub const DEFAULT_LOGSCALE_BASE: f64 = 10.0;
/// Log bases with a smaller magnitude fall back to the default.
pub const MINIMUM_LOGSCALE_BASE: f64 = 0.1;

const MINIMUM_PADDING_VALUE: f64 = 0.001;

/// Axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log { base: f64 },
}

impl Scale {
    pub fn name(&self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log { .. } => "log",
        }
    }
}

/// Label, limits, scale and tick marks of one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    label: Option<Label>,
    min: Option<f64>,
    max: Option<f64>,
    scale: Scale,
    major_ticks: Option<Vec<f64>>,
    minor_ticks: Option<Vec<f64>>,
    tick_format: Option<String>,
}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    // Label

    pub fn reset_label(&mut self) {
        self.label = None;
    }

    /// Create the label when text is given and none exists yet; otherwise
    /// update whichever fields are given.
    pub fn set_label(&mut self, text: Option<&str>, size: Option<i64>) {
        match self.label.as_mut() {
            None => {
                self.label = text.map(|t| Label::new(Some(t), size));
            }
            Some(label) => {
                if text.is_some() {
                    label.set_label(text);
                }
                if size.is_some() {
                    label.set_size(size);
                }
            }
        }
    }

    /// The assigned label, or an empty one.
    pub fn label(&self) -> Label {
        self.label
            .clone()
            .unwrap_or_else(|| Label::new(Some(""), None))
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    pub fn set_label_string(&mut self, text: &str) {
        self.label
            .get_or_insert_with(|| Label::new(Some(""), None))
            .set_label(Some(text));
    }

    pub fn set_label_fontsize(&mut self, size: i64) {
        self.label
            .get_or_insert_with(|| Label::new(Some(""), None))
            .set_size(Some(size));
    }

    pub fn label_string(&self) -> String {
        self.label().label().to_string()
    }

    pub fn label_fontsize(&self) -> u32 {
        self.label().size()
    }

    // Limits

    pub fn reset_limits(&mut self) {
        self.min = None;
        self.max = None;
    }

    /// Assign the maximum, then the minimum.
    pub fn set_limits(&mut self, min: Option<f64>, max: Option<f64>) {
        self.set_maximum(max);
        self.set_minimum(min);
    }

    /// Assign the upper limit. Absent or non-finite input unsets it, as does
    /// a value below the current minimum.
    pub fn set_maximum(&mut self, max: Option<f64>) {
        self.max = match max.filter(|m| m.is_finite()) {
            None => None,
            Some(m) => match self.min {
                Some(min) if min > m => {
                    warn!(
                        "unable to assign axis maximum {}: lower than the current minimum {}",
                        m, min
                    );
                    None
                }
                _ => Some(m),
            },
        };
    }

    /// Assign the lower limit. Absent or non-finite input unsets it, as does
    /// a value above the current maximum.
    pub fn set_minimum(&mut self, min: Option<f64>) {
        self.min = match min.filter(|m| m.is_finite()) {
            None => None,
            Some(m) => match self.max {
                Some(max) if max < m => {
                    warn!(
                        "unable to assign axis minimum {}: higher than the current maximum {}",
                        m, max
                    );
                    None
                }
                _ => Some(m),
            },
        };
    }

    pub fn maximum(&self) -> Option<f64> {
        self.max
    }

    pub fn minimum(&self) -> Option<f64> {
        self.min
    }

    pub fn has_maximum(&self) -> bool {
        self.max.is_some()
    }

    pub fn has_minimum(&self) -> bool {
        self.min.is_some()
    }

    // Scale

    pub fn reset_scale(&mut self) {
        self.scale = Scale::Linear;
    }

    /// `"log"` selects a logarithmic scale, anything else is linear. The log
    /// base is stored as `|base|`, with the default substituted for absent,
    /// non-finite, tiny, or unit bases.
    pub fn set_scale(&mut self, kind: Option<&str>, base: Option<f64>) {
        self.scale = match kind {
            Some("log") => Scale::Log {
                base: sanitize_base(base),
            },
            Some("linear") | None => Scale::Linear,
            Some(other) => {
                warn!("unknown axis scale '{}', using linear", other);
                Scale::Linear
            }
        };
    }

    pub fn is_logscale(&self) -> bool {
        matches!(self.scale, Scale::Log { .. })
    }

    pub fn is_linearscale(&self) -> bool {
        self.scale == Scale::Linear
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn scale_name(&self) -> &'static str {
        self.scale.name()
    }

    pub fn logscale_base(&self) -> Option<f64> {
        match self.scale {
            Scale::Log { base } => Some(base),
            Scale::Linear => None,
        }
    }

    // Major ticks

    pub fn reset_major_ticks(&mut self) {
        self.major_ticks = None;
    }

    /// Generate `nticks` evenly spaced major ticks from `minval` to `maxval`
    /// and pad the axis limits around them.
    ///
    /// Missing bounds are taken from the current limits. Fails, leaving the
    /// axis unchanged, when a bound cannot be determined, `nticks < 2`, or
    /// the range is empty.
    pub fn set_major_ticks(
        &mut self,
        minval: Option<f64>,
        maxval: Option<f64>,
        nticks: Option<usize>,
        pad: Option<f64>,
    ) -> PlotResult<()> {
        let min = minval.filter(|v| v.is_finite()).or(self.min).ok_or_else(|| {
            PlotError::InvalidConfig("major ticks need a minimum value".to_string())
        })?;
        let max = maxval.filter(|v| v.is_finite()).or(self.max).ok_or_else(|| {
            PlotError::InvalidConfig("major ticks need a maximum value".to_string())
        })?;
        let nticks = nticks.unwrap_or(DEFAULT_NUMBER_MAJOR_TICKS);
        if nticks < 2 {
            return Err(PlotError::InvalidConfig(format!(
                "number of major ticks must be 2 or greater, got {}",
                nticks
            )));
        }
        if max <= min {
            return Err(PlotError::InvalidConfig(format!(
                "major tick maximum {} must be greater than minimum {}",
                max, min
            )));
        }
        let pad = pad
            .filter(|p| p.is_finite() && *p > MINIMUM_PADDING_VALUE)
            .unwrap_or(DEFAULT_PADDING_VALUE);

        let (lo, hi) = scale::pad_range(min, max, pad);
        self.reset_limits();
        self.set_limits(Some(lo), Some(hi));
        self.major_ticks = Some(scale::linear_ticks(min, max, nticks));
        Ok(())
    }

    /// Use an explicit list of major tick positions.
    pub fn set_major_tick_values(&mut self, ticks: Vec<f64>) {
        self.major_ticks = Some(ticks);
    }

    pub fn major_ticks(&self) -> Option<&[f64]> {
        self.major_ticks.as_deref()
    }

    pub fn has_major_ticks(&self) -> bool {
        self.major_ticks.is_some()
    }

    // Minor ticks

    pub fn reset_minor_ticks(&mut self) {
        self.minor_ticks = None;
    }

    /// Place `nticks` minor ticks inside every interval between major ticks.
    /// Requires major ticks; on failure the minor ticks are left as they were.
    pub fn set_minor_ticks(&mut self, nticks: Option<usize>) -> PlotResult<()> {
        let nticks = nticks.unwrap_or(DEFAULT_NUMBER_MINOR_TICKS);
        if nticks < 1 {
            return Err(PlotError::InvalidConfig(
                "number of minor ticks must be 1 or greater".to_string(),
            ));
        }
        let major = self.major_ticks.as_deref().ok_or_else(|| {
            PlotError::InvalidConfig(
                "cannot assign minor ticks before major ticks are assigned".to_string(),
            )
        })?;
        self.minor_ticks = Some(scale::minor_ticks(major, nticks));
        Ok(())
    }

    /// Use an explicit list of minor tick positions.
    pub fn set_minor_tick_values(&mut self, ticks: Vec<f64>) {
        self.minor_ticks = Some(ticks);
    }

    pub fn minor_ticks(&self) -> Option<&[f64]> {
        self.minor_ticks.as_deref()
    }

    pub fn has_minor_ticks(&self) -> bool {
        self.minor_ticks.is_some()
    }

    // Tick labels

    /// Template for tick labels, e.g. `"{:.2f}"`. `None` restores automatic
    /// formatting.
    pub fn set_tick_format(&mut self, format: Option<&str>) {
        self.tick_format = format.map(str::to_string);
    }

    pub fn tick_format(&self) -> Option<&str> {
        self.tick_format.as_deref()
    }

    /// Format a tick value as a label.
    pub fn format_tick(&self, value: f64) -> String {
        if let Some(ref format) = self.tick_format {
            return format_template(format, &Value::Number(value));
        }
        if value == 0.0 {
            "0".to_string()
        } else if self.is_logscale() {
            if value.fract() == 0.0 && value.abs() < 1e6 {
                format!("{:.0}", value)
            } else {
                format!("{:e}", value)
            }
        } else if value.abs() >= 1e5 || value.abs() < 1e-3 {
            format!("{:.1e}", value)
        } else if value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            // Shortest of up to four decimals, without trailing zeros.
            let s = format!("{:.4}", value);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

fn sanitize_base(base: Option<f64>) -> f64 {
    match base {
        Some(b) if b.is_finite() && b.abs() >= MINIMUM_LOGSCALE_BASE && b.abs() != 1.0 => b.abs(),
        Some(b) => {
            warn!("unusable log base {}, using {}", b, DEFAULT_LOGSCALE_BASE);
            DEFAULT_LOGSCALE_BASE
        }
        None => DEFAULT_LOGSCALE_BASE,
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "None".to_string(), |b| b.to_string())
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Axis Label String: {}", self.label_string())?;
        writeln!(f, "Axis Label Fontsize: {}", self.label_fontsize())?;
        writeln!(
            f,
            "Axis Limits (min, max): ({}, {})",
            fmt_bound(self.min),
            fmt_bound(self.max)
        )?;
        match self.scale {
            Scale::Linear => write!(f, "Axis Scale: linear"),
            Scale::Log { base } => write!(f, "Axis Scale: log (base {})", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_limits_valid() {
        let mut axis = Axis::new();
        axis.set_limits(Some(0.0), Some(10.0));
        assert_eq!(axis.minimum(), Some(0.0));
        assert_eq!(axis.maximum(), Some(10.0));
    }

    #[test]
    fn test_set_limits_crossing_is_rejected() {
        let mut axis = Axis::new();
        axis.set_limits(Some(10.0), Some(0.0));
        assert_eq!(axis.maximum(), Some(0.0));
        assert_eq!(axis.minimum(), None);

        axis.set_maximum(Some(f64::NAN));
        assert!(!axis.has_maximum());
    }

    #[test]
    fn test_label_creation_and_update() {
        let mut axis = Axis::new();
        axis.set_label(None, Some(20));
        assert!(!axis.has_label());
        assert_eq!(axis.label().label(), "");

        axis.set_label(Some("Cyclic Period"), None);
        axis.set_label(None, Some(3));
        assert_eq!(axis.label_string(), "Cyclic Period");
        assert_eq!(axis.label_fontsize(), 6);

        let mut axis = Axis::new();
        axis.set_label_fontsize(18);
        assert!(axis.has_label());
        assert_eq!(axis.label_fontsize(), 18);
    }

    #[test]
    fn test_scale_selection() {
        let mut axis = Axis::new();
        assert!(axis.is_linearscale());
        assert_eq!(axis.logscale_base(), None);

        axis.set_scale(Some("log"), Some(-2.0));
        assert_eq!(axis.logscale_base(), Some(2.0));

        axis.set_scale(Some("log"), Some(1.0));
        assert_eq!(axis.logscale_base(), Some(DEFAULT_LOGSCALE_BASE));

        axis.set_scale(Some("log"), Some(0.01));
        assert_eq!(axis.logscale_base(), Some(DEFAULT_LOGSCALE_BASE));

        axis.set_scale(Some("symlog"), None);
        assert_eq!(axis.scale_name(), "linear");
    }

    #[test]
    fn test_major_ticks_with_padding() {
        let mut axis = Axis::new();
        axis.set_major_ticks(Some(0.0), Some(10.0), Some(3), None).unwrap();
        assert_eq!(axis.major_ticks(), Some(&[0.0, 5.0, 10.0][..]));
        assert_relative_eq!(axis.minimum().unwrap(), -0.5);
        assert_relative_eq!(axis.maximum().unwrap(), 10.5);
    }

    #[test]
    fn test_major_ticks_from_existing_limits() {
        let mut axis = Axis::new();
        axis.set_limits(Some(20.0), Some(30.0));
        axis.set_major_ticks(None, None, Some(6), Some(0.1)).unwrap();
        assert_eq!(axis.major_ticks().unwrap().len(), 6);
        assert_relative_eq!(axis.minimum().unwrap(), 19.0);
        assert_relative_eq!(axis.maximum().unwrap(), 31.0);

        // New ticks below the old range still produce consistent limits.
        axis.set_major_ticks(Some(0.0), Some(10.0), None, None).unwrap();
        assert_relative_eq!(axis.minimum().unwrap(), -0.5);
        assert_relative_eq!(axis.maximum().unwrap(), 10.5);
    }

    #[test]
    fn test_major_ticks_failures_leave_axis_unchanged() {
        let mut axis = Axis::new();
        assert!(axis.set_major_ticks(None, Some(1.0), None, None).is_err());
        assert!(axis.set_major_ticks(Some(0.0), Some(1.0), Some(1), None).is_err());
        assert!(axis.set_major_ticks(Some(2.0), Some(1.0), None, None).is_err());
        assert!(!axis.has_major_ticks());
        assert!(!axis.has_minimum());
        assert!(!axis.has_maximum());
    }

    #[test]
    fn test_minor_ticks_require_major() {
        let mut axis = Axis::new();
        assert!(axis.set_minor_ticks(None).is_err());
        assert!(!axis.has_minor_ticks());

        axis.set_major_ticks(Some(0.0), Some(10.0), Some(3), None).unwrap();
        assert!(axis.set_minor_ticks(Some(0)).is_err());
        assert!(!axis.has_minor_ticks());

        axis.set_minor_ticks(Some(4)).unwrap();
        assert_eq!(axis.minor_ticks().unwrap().len(), 8);
    }

    #[test]
    fn test_format_tick() {
        let mut axis = Axis::new();
        assert_eq!(axis.format_tick(0.0), "0");
        assert_eq!(axis.format_tick(5.0), "5");
        assert_eq!(axis.format_tick(0.25), "0.25");
        assert_eq!(axis.format_tick(250000.0), "2.5e5");

        axis.set_tick_format(Some("{:.2f}"));
        assert_eq!(axis.format_tick(5.0), "5.00");
    }

    #[test]
    fn test_display() {
        let mut axis = Axis::new();
        axis.set_label(Some("Permeability"), Some(14));
        axis.set_limits(Some(0.0), Some(1.0));
        let s = axis.to_string();
        assert!(s.contains("Axis Label String: Permeability"));
        assert!(s.contains("Axis Limits (min, max): (0, 1)"));
        assert!(s.ends_with("Axis Scale: linear"));
    }
}
