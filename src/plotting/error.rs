//! Error types for figure loading and rendering.

use std::fmt;
use std::io;

use plotters::drawing::DrawingAreaErrorKind;

/// The main error type for plotting operations.
#[derive(Debug)]
pub enum PlotError {
    /// Error during IO operations (file reading, writing, directory creation)
    Io(io::Error),
    /// Error while reading or writing CSV data
    Csv(csv::Error),
    /// Error while encoding the rendered image
    Image(image::ImageError),
    /// Invalid data provided for plotting
    InvalidData(String),
    /// Invalid configuration or parameters
    InvalidConfig(String),
    /// A requested column does not exist in the source data
    MissingColumn(String),
    /// Rendering error
    RenderError(String),
    /// Empty data provided where non-empty data is required
    EmptyData,
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotError::Io(err) => write!(f, "IO error: {}", err),
            PlotError::Csv(err) => write!(f, "CSV error: {}", err),
            PlotError::Image(err) => write!(f, "Image encoding error: {}", err),
            PlotError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            PlotError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            PlotError::MissingColumn(name) => write!(f, "Column '{}' not found in data", name),
            PlotError::RenderError(msg) => write!(f, "Render error: {}", msg),
            PlotError::EmptyData => write!(f, "Empty data provided"),
        }
    }
}

impl std::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlotError::Io(err) => Some(err),
            PlotError::Csv(err) => Some(err),
            PlotError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PlotError {
    fn from(err: io::Error) -> Self {
        PlotError::Io(err)
    }
}

impl From<csv::Error> for PlotError {
    fn from(err: csv::Error) -> Self {
        PlotError::Csv(err)
    }
}

impl From<image::ImageError> for PlotError {
    fn from(err: image::ImageError) -> Self {
        PlotError::Image(err)
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::RenderError(err.to_string())
    }
}

/// Result type alias for plotting operations.
pub type PlotResult<T> = Result<T, PlotError>;
