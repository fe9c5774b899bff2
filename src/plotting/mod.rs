//! Figure state and one-shot chart rendering.
//!
//! A [`Figure`] holds titles, two axes and a working dataset split into
//! series by an isolation column. The functions in [`plot`] read a figure
//! and draw it with plotters' bitmap backend.

pub mod axis;
pub mod backend;
pub mod data;
pub mod element;
pub mod error;
pub mod figure;
pub mod fit;
pub mod label;
pub mod plot;
pub mod scale;
pub mod style;

pub use axis::{Axis, Scale};
pub use backend::{Canvas, FileType};
pub use data::{Dataset, IntoColumn, Value};
pub use error::{PlotError, PlotResult};
pub use figure::{ColumnSelection, Figure};
pub use fit::Fit;
pub use label::Label;
pub use style::{Color, Colormap, DashPattern, Marker};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::PlotConfig;
    pub use crate::plotting::axis::{Axis, Scale};
    pub use crate::plotting::backend::{Canvas, FileType};
    pub use crate::plotting::data::{Dataset, Value};
    pub use crate::plotting::error::{PlotError, PlotResult};
    pub use crate::plotting::figure::{ColumnSelection, Figure};
    pub use crate::plotting::fit::Fit;
    pub use crate::plotting::label::Label;
    pub use crate::plotting::plot::{
        gen_bar_chart, gen_pie_chart, gen_plot, scatter, BarOptions, PieOptions, PlotOptions,
        ScatterOptions,
    };
    pub use crate::plotting::style::{Color, Colormap, DashPattern, Marker};
}
