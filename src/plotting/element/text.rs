//! Text rendering: font registration, measurement and anchored drawing.
//!
//! Glyphs are rasterized by plotters' `ab_glyph` renderer, which needs a
//! TrueType font registered under the `sans-serif` family before first use.
//! Without one, text is skipped and the rest of the figure still renders.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::DrawingBackend;
use plotters::style::{FontStyle, FontTransform, IntoFont, TextStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::plotting::error::PlotResult;
use crate::plotting::style::Color;

/// Environment variable naming a TrueType font file.
pub const FONT_ENV_VAR: &str = "PLOTFIG_FONT";

const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a font for text rendering. Only the first call has an effect;
/// later calls report whether that registration succeeded.
pub fn init_font(preferred: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = preferred {
            candidates.push(path.to_path_buf());
        }
        if let Ok(path) = env::var(FONT_ENV_VAR) {
            candidates.push(PathBuf::from(path));
        }
        candidates.extend(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            // The registry keeps the bytes for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
                Ok(()) => {
                    debug!("registered font {}", path.display());
                    return true;
                }
                Err(_) => warn!("unable to use font {}", path.display()),
            }
        }
        warn!(
            "no usable TrueType font found; set {} to a .ttf file to render text",
            FONT_ENV_VAR
        );
        false
    })
}

fn font_ready() -> bool {
    FONT_READY.get().copied().unwrap_or(false)
}

/// Strip mathtext dollar delimiters, which are not typeset.
pub fn plain_text(text: &str) -> String {
    text.replace('$', "")
}

/// Horizontal and vertical alignment of a text block relative to its anchor.
#[derive(Clone, Copy)]
pub struct Anchor {
    pub h: HPos,
    pub v: VPos,
}

// plotters' `HPos`/`VPos` do not implement `Debug`, so it cannot be derived.
impl std::fmt::Debug for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let h = match self.h {
            HPos::Left => "Left",
            HPos::Right => "Right",
            HPos::Center => "Center",
        };
        let v = match self.v {
            VPos::Top => "Top",
            VPos::Center => "Center",
            VPos::Bottom => "Bottom",
        };
        f.debug_struct("Anchor").field("h", &format_args!("{h}")).field("v", &format_args!("{v}")).finish()
    }
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { h: HPos::Center, v: VPos::Center };
    pub const TOP_CENTER: Anchor = Anchor { h: HPos::Center, v: VPos::Top };
    pub const BOTTOM_CENTER: Anchor = Anchor { h: HPos::Center, v: VPos::Bottom };
    pub const RIGHT_CENTER: Anchor = Anchor { h: HPos::Right, v: VPos::Center };
    pub const LEFT_CENTER: Anchor = Anchor { h: HPos::Left, v: VPos::Center };
}

/// Text to draw in pixel space.
#[derive(Debug, Clone)]
pub struct Text {
    /// The text content
    pub content: String,
    /// Font size in pixels
    pub size: f64,
    pub color: Color,
    pub anchor: Anchor,
    /// Rotate a quarter turn counterclockwise (y axis labels)
    pub vertical: bool,
}

impl Text {
    pub fn new(content: &str, size: f64) -> Self {
        Text {
            content: plain_text(content),
            size,
            color: Color::BLACK,
            anchor: Anchor::CENTER,
            vertical: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Width and height in pixels, before rotation. Falls back to an
    /// estimate from the character count when no font is available.
    pub fn extent<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> (f64, f64) {
        if self.content.is_empty() {
            return (0.0, 0.0);
        }
        if font_ready() {
            let style = TextStyle::from((FONT_FAMILY, self.size).into_font());
            if let Ok((w, h)) = area.estimate_text_size(&self.content, &style) {
                return (w as f64, h as f64);
            }
        }
        (
            self.content.chars().count() as f64 * self.size * 0.6,
            self.size,
        )
    }

    /// Size of the rendered block on the page, accounting for rotation.
    pub fn footprint<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> (f64, f64) {
        let (w, h) = self.extent(area);
        if self.vertical {
            (h, w)
        } else {
            (w, h)
        }
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        at: (i32, i32),
    ) -> PlotResult<()> {
        if self.content.is_empty() || !font_ready() {
            return Ok(());
        }
        let font = (FONT_FAMILY, self.size).into_font();
        let font = if self.vertical {
            font.transform(FontTransform::Rotate270)
        } else {
            font
        };
        let color = self.color.to_plotters();
        let style = TextStyle::from(font)
            .color(&color)
            .pos(Pos::new(self.anchor.h, self.anchor.v));
        area.draw_text(&self.content, &style, at)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_math_delimiters() {
        assert_eq!(plain_text("Cyclic Period ($s$)"), "Cyclic Period (s)");
        assert_eq!(Text::new("$K$ = 1.0e-03", 10.0).content, "K = 1.0e-03");
    }

    #[test]
    fn test_init_font_is_idempotent() {
        let first = init_font(None);
        assert_eq!(init_font(Some(Path::new("/nonexistent.ttf"))), first);
    }
}
