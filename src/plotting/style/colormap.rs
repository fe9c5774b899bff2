//! Colormaps used to color series and scatter points.

use std::fmt;
use std::str::FromStr;

use super::color::{cycle_color, Color};

/// Control points of matplotlib's `coolwarm` diverging map.
const COOLWARM: [(f64, (u8, u8, u8)); 5] = [
    (0.00, (59, 76, 192)),
    (0.25, (124, 159, 249)),
    (0.50, (221, 221, 221)),
    (0.75, (246, 154, 122)),
    (1.00, (180, 4, 38)),
];

/// A named colormap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Qualitative ten-color cycle.
    #[default]
    Tab10,
    /// Blue to red diverging map.
    Coolwarm,
}

impl Colormap {
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Tab10 => "tab10",
            Colormap::Coolwarm => "coolwarm",
        }
    }

    /// Sample the map at `t` in `[0, 1]`. Tab10 is divided into ten bands.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Colormap::Tab10 => cycle_color(((t * 10.0) as usize).min(9)),
            Colormap::Coolwarm => {
                let upper = COOLWARM
                    .iter()
                    .position(|(stop, _)| *stop >= t)
                    .unwrap_or(COOLWARM.len() - 1)
                    .max(1);
                let (t0, c0) = COOLWARM[upper - 1];
                let (t1, c1) = COOLWARM[upper];
                let f = (t - t0) / (t1 - t0);
                let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
                Color::Rgb(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2))
            }
        }
    }

    /// `n` colors for `n` series: tab10 cycles, continuous maps are sampled
    /// evenly from end to end.
    pub fn colors(&self, n: usize) -> Vec<Color> {
        match self {
            Colormap::Tab10 => (0..n).map(cycle_color).collect(),
            Colormap::Coolwarm => match n {
                0 => Vec::new(),
                1 => vec![self.sample(0.0)],
                _ => (0..n)
                    .map(|i| self.sample(i as f64 / (n - 1) as f64))
                    .collect(),
            },
        }
    }

    /// Map values onto the colormap between their minimum and maximum.
    pub fn map_values(&self, values: &[f64]) -> Vec<Color> {
        let (lo, hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let span = hi - lo;
        values
            .iter()
            .map(|v| {
                if span > 0.0 {
                    self.sample((v - lo) / span)
                } else {
                    self.sample(0.5)
                }
            })
            .collect()
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab10" => Ok(Colormap::Tab10),
            "coolwarm" => Ok(Colormap::Coolwarm),
            other => Err(format!("unknown colormap '{}'", other)),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("coolwarm".parse::<Colormap>(), Ok(Colormap::Coolwarm));
        assert_eq!("Tab10".parse::<Colormap>(), Ok(Colormap::Tab10));
        assert!("viridis".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_coolwarm_endpoints() {
        let map = Colormap::Coolwarm;
        assert_eq!(map.sample(0.0), Color::Rgb(59, 76, 192));
        assert_eq!(map.sample(1.0), Color::Rgb(180, 4, 38));
        assert_eq!(map.sample(0.5), Color::Rgb(221, 221, 221));
        assert_eq!(map.sample(-3.0), map.sample(0.0));
    }

    #[test]
    fn test_colors_count() {
        assert_eq!(Colormap::Tab10.colors(12).len(), 12);
        assert_eq!(Colormap::Tab10.colors(12)[10], cycle_color(0));
        let cw = Colormap::Coolwarm.colors(3);
        assert_eq!(cw[0], Colormap::Coolwarm.sample(0.0));
        assert_eq!(cw[2], Colormap::Coolwarm.sample(1.0));
    }

    #[test]
    fn test_map_values_constant() {
        let colors = Colormap::Coolwarm.map_values(&[2.0, 2.0]);
        assert_eq!(colors[0], Colormap::Coolwarm.sample(0.5));
    }
}
