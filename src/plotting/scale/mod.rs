//! Axis scaling and tick generation.

mod linear;
mod log;

pub use self::linear::{linear_ticks, minor_ticks, nice_number, nice_ticks, pad_range};
pub use self::log::{log_minor_ticks, log_ticks, pad_log_range};

use crate::plotting::axis::Scale;

/// Maps data values into the space the chart is drawn in: identity for
/// linear axes, `log_base(v)` for log axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    log_base: Option<f64>,
}

impl AxisMap {
    pub fn new(scale: Scale) -> Self {
        match scale {
            Scale::Linear => AxisMap { log_base: None },
            Scale::Log { base } => AxisMap { log_base: Some(base) },
        }
    }

    pub fn linear() -> Self {
        AxisMap { log_base: None }
    }

    pub fn is_log(&self) -> bool {
        self.log_base.is_some()
    }

    /// Transform a data value. Non-finite values, and non-positive values on
    /// a log axis, have no position.
    pub fn forward(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self.log_base {
            None => Some(value),
            Some(_) if value <= 0.0 => None,
            Some(base) => Some(value.ln() / base.ln()),
        }
    }

    /// Inverse of [`AxisMap::forward`].
    pub fn inverse(&self, display: f64) -> f64 {
        match self.log_base {
            None => display,
            Some(base) => base.powf(display),
        }
    }

    /// Transform a data range into display space, widening degenerate ranges.
    pub fn display_range(&self, min: f64, max: f64) -> Option<(f64, f64)> {
        let lo = self.forward(min)?;
        let hi = self.forward(max)?;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if hi > lo {
            Some((lo, hi))
        } else {
            let padding = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            Some((lo - padding, hi + padding))
        }
    }
}
