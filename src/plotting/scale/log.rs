//! Ticks on logarithmic axes: majors at integer powers of the base, minors
//! at the integer multiples in between.

/// Integer powers of `base` inside `[min, max]`. Both bounds must be positive.
pub fn log_ticks(min: f64, max: f64, base: f64) -> Vec<f64> {
    if !(min > 0.0 && max > min && base > 1.0) {
        return Vec::new();
    }
    let first = (min.ln() / base.ln() - 1e-9).ceil() as i32;
    let last = (max.ln() / base.ln() + 1e-9).floor() as i32;
    (first..=last).map(|k| base.powi(k)).collect()
}

/// Multiples `m * base^k` (m = 2 ..= base - 1) inside `[min, max]`. Bases
/// below 3 have no integer multiples between powers, so nothing is produced.
pub fn log_minor_ticks(min: f64, max: f64, base: f64) -> Vec<f64> {
    if !(min > 0.0 && max > min && base >= 3.0) {
        return Vec::new();
    }
    let first = (min.ln() / base.ln()).floor() as i32;
    let last = (max.ln() / base.ln()).ceil() as i32;
    let multiples = base.floor() as i32;

    let mut ticks = Vec::new();
    for k in first..=last {
        let decade = base.powi(k);
        for m in 2..multiples {
            let tick = m as f64 * decade;
            if tick >= min && tick <= max {
                ticks.push(tick);
            }
        }
    }
    ticks
}

/// Widen a positive range by `pad` of its span measured in powers of `base`.
pub fn pad_log_range(min: f64, max: f64, base: f64, pad: f64) -> (f64, f64) {
    if !(min > 0.0 && max > 0.0 && base > 1.0) {
        return (min, max);
    }
    let decades = (max / min).ln() / base.ln();
    let factor = base.powf(decades * pad);
    (min / factor, max * factor)
}
