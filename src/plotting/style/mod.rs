//! Styling module.
//!
//! Colors, colormaps, line styles and markers, with the conversions the
//! bitmap renderer needs.

pub mod color;
pub mod colormap;
pub mod line_style;
pub mod marker;

pub use color::{cycle_color, Color};
pub use colormap::Colormap;
pub use line_style::{dash_polyline, DashPattern, LineStyle};
pub use marker::{Marker, MarkerShape, MarkerStyle};
