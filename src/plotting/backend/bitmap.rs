//! Bitmap rendering backend.
//!
//! Draws into an in-memory RGB buffer through plotters' `BitMapBackend` and
//! encodes the result with the `image` crate.

use std::fmt;
use std::fs;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::info;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::{BitMapBackend, IntoDrawingArea};
use plotters::style::RGBColor;

use crate::plotting::error::{PlotError, PlotResult};

/// Root drawing area of a canvas.
pub type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Image file formats a figure can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    Png,
    Tif,
}

impl FileType {
    /// Match an extension against the allow-list (`.png`, `.tif`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "png" => Some(FileType::Png),
            "tif" => Some(FileType::Tif),
            _ => None,
        }
    }

    /// Extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Png => ".png",
            FileType::Tif => ".tif",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            FileType::Png => ImageFormat::Png,
            FileType::Tif => ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A rendered RGB image.
#[derive(Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Render a `width` x `height` image on a white background.
    pub fn render<F>(width: u32, height: u32, draw: F) -> PlotResult<Self>
    where
        F: FnOnce(&Root<'_>) -> PlotResult<()>,
    {
        if width == 0 || height == 0 {
            return Err(PlotError::InvalidConfig(format!(
                "canvas size {}x{} has no pixels",
                width, height
            )));
        }
        let mut pixels = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&RGBColor(255, 255, 255))?;
            draw(&root)?;
            root.present()?;
        }
        Ok(Canvas {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Encode and write the image, creating the parent directory if needed.
    pub fn save(&self, path: &Path, file_type: FileType) -> PlotResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let image = RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| PlotError::RenderError("pixel buffer has the wrong size".to_string()))?;
        image.save_with_format(path, file_type.image_format())?;
        info!("Saved figure to {}", path.display());
        Ok(())
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::element::Rectangle;
    use plotters::style::{RGBAColor, ShapeStyle};

    #[test]
    fn test_file_type_allow_list() {
        assert_eq!(FileType::from_extension(".png"), Some(FileType::Png));
        assert_eq!(FileType::from_extension("tif"), Some(FileType::Tif));
        assert_eq!(FileType::from_extension(".jpg"), None);
        assert_eq!(FileType::Tif.to_string(), ".tif");
    }

    #[test]
    fn test_render_fills_white_and_draws() {
        let canvas = Canvas::render(20, 10, |root| {
            root.draw(&Rectangle::new(
                [(0, 0), (4, 4)],
                ShapeStyle {
                    color: RGBAColor(255, 0, 0, 1.0),
                    filled: true,
                    stroke_width: 1,
                },
            ))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(canvas.pixels().len(), 20 * 10 * 3);
        assert_eq!(canvas.pixel(2, 2), Some((255, 0, 0)));
        assert_eq!(canvas.pixel(15, 8), Some((255, 255, 255)));
        assert_eq!(canvas.pixel(20, 0), None);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(Canvas::render(0, 10, |_| Ok(())).is_err());
    }

    #[test]
    fn test_save_png_creates_directory() {
        let dir = std::env::temp_dir().join(format!("plotfig-canvas-{}", std::process::id()));
        let path = dir.join("nested").join("blank.png");
        let canvas = Canvas::render(8, 8, |_| Ok(())).unwrap();
        canvas.save(&path, FileType::Png).unwrap();
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_tif_reads_back() {
        let dir = std::env::temp_dir().join(format!("plotfig-tif-{}", std::process::id()));
        let path = dir.join("square.tif");
        let canvas = Canvas::render(12, 6, |root| {
            root.draw(&Rectangle::new(
                [(0, 0), (3, 3)],
                ShapeStyle {
                    color: RGBAColor(0, 0, 255, 1.0),
                    filled: true,
                    stroke_width: 1,
                },
            ))?;
            Ok(())
        })
        .unwrap();
        canvas.save(&path, FileType::Tif).unwrap();
        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (12, 6));
        assert_eq!(saved.get_pixel(1, 1).0, [0, 0, 255]);
        assert_eq!(saved.get_pixel(10, 5).0, [255, 255, 255]);
        let _ = fs::remove_dir_all(&dir);
    }
}
