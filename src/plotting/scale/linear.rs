//! Evenly spaced ticks on linear axes.

/// `n` evenly spaced points from `min` to `max` inclusive, with step
/// `(max - min) / (n - 1)`. The last point is exactly `max`.
pub fn linear_ticks(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Divide each interval between consecutive major ticks into `n + 1`
/// sections and return the `n` interior points of every interval.
pub fn minor_ticks(major: &[f64], n: usize) -> Vec<f64> {
    let mut ticks = Vec::with_capacity(major.len().saturating_sub(1) * n);
    for pair in major.windows(2) {
        let step = (pair[1] - pair[0]) / (n + 1) as f64;
        ticks.extend((1..=n).map(|k| pair[0] + step * k as f64));
    }
    ticks
}

/// Widen `[min, max]` symmetrically by `pad` times its span.
pub fn pad_range(min: f64, max: f64, pad: f64) -> (f64, f64) {
    let span = max - min;
    (min - span * pad, max + span * pad)
}

/// Compute "nice" numbers for axis ticks.
pub fn nice_number(range: f64, round: bool) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10_f64.powf(exponent);

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * 10_f64.powf(exponent)
}

/// Round-numbered tick positions inside `[min, max]`, used when an axis has
/// no explicit major ticks.
pub fn nice_ticks(min: f64, max: f64, num_ticks: usize) -> Vec<f64> {
    if num_ticks < 2 || !(max > min) {
        return vec![(min + max) / 2.0];
    }

    let range = nice_number(max - min, false);
    let tick_spacing = nice_number(range / (num_ticks - 1) as f64, true);
    let nice_min = (min / tick_spacing).floor() * tick_spacing;
    let nice_max = (max / tick_spacing).ceil() * tick_spacing;

    let mut ticks = Vec::new();
    let mut i = 0;
    loop {
        let tick = nice_min + tick_spacing * i as f64;
        if tick > nice_max + tick_spacing * 0.5 {
            break;
        }
        if tick >= min - tick_spacing * 0.001 && tick <= max + tick_spacing * 0.001 {
            // Snap values like 0.30000000000000004 back onto the grid.
            let snapped = (tick / tick_spacing).round() * tick_spacing;
            ticks.push(if snapped.abs() < tick_spacing * 1e-9 { 0.0 } else { snapped });
        }
        i += 1;
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_ticks() {
        assert_eq!(linear_ticks(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(linear_ticks(0.0, 1.0, 4).len(), 4);
        assert_eq!(*linear_ticks(0.0, 1.0, 4).last().unwrap(), 1.0);
        assert!(linear_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_minor_ticks_interior_points() {
        let minor = minor_ticks(&[0.0, 5.0, 10.0], 4);
        assert_eq!(minor.len(), 8);
        assert_relative_eq!(minor[0], 1.0);
        assert_relative_eq!(minor[3], 4.0);
        assert_relative_eq!(minor[4], 6.0);
        assert_relative_eq!(minor[7], 9.0);
    }

    #[test]
    fn test_pad_range() {
        let (lo, hi) = pad_range(0.0, 10.0, 0.05);
        assert_relative_eq!(lo, -0.5);
        assert_relative_eq!(hi, 10.5);
    }

    #[test]
    fn test_nice_ticks() {
        let ticks = nice_ticks(0.0, 1.0, 6);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert_relative_eq!(*ticks.last().unwrap(), 1.0, epsilon = 1e-12);
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));

        let ticks = nice_ticks(-0.4, 10.4, 5);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|t| *t >= -0.4 && *t <= 10.4));
    }
}
