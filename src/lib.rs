//! Figure, axis and label containers with one-shot chart rendering.
//!
//! Populate a [`plotting::Figure`], then hand it to one of the `gen_*`
//! functions in [`plotting::plot`] to draw a line plot, scatter plot, pie
//! chart or bar chart into a PNG or TIFF file.

pub mod config;
pub mod plotting;

pub use plotting::prelude;
