//! Rendering backends.

mod bitmap;
pub mod viewer;

pub use bitmap::{Canvas, FileType, Root};
