//! Interactive display of a rendered canvas.
//!
//! With the `show` feature an `eframe` window opens and blocks until it is
//! closed. Without it, showing a figure only logs a warning.

use super::Canvas;
use crate::plotting::error::PlotResult;

#[cfg(feature = "show")]
mod window {
    use eframe::egui;

    use super::Canvas;
    use crate::plotting::error::{PlotError, PlotResult};

    struct ViewerApp {
        image: egui::ColorImage,
        texture: Option<egui::TextureHandle>,
    }

    impl eframe::App for ViewerApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            let image = &self.image;
            let texture = self
                .texture
                .get_or_insert_with(|| ctx.load_texture("figure", image.clone(), Default::default()));
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.add(egui::Image::new(&*texture).shrink_to_fit());
            });
        }
    }

    pub fn show(canvas: &Canvas, title: &str) -> PlotResult<()> {
        let size = [canvas.width() as usize, canvas.height() as usize];
        let app = ViewerApp {
            image: egui::ColorImage::from_rgb(size, canvas.pixels()),
            texture: None,
        };
        eframe::run_native(
            title,
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
        .map_err(|e| PlotError::RenderError(format!("unable to open figure window: {}", e)))
    }
}

/// Display the canvas in a window titled `title`. Blocks until the window
/// is closed.
#[cfg(feature = "show")]
pub fn show(canvas: &Canvas, title: &str) -> PlotResult<()> {
    window::show(canvas, title)
}

/// Display the canvas in a window titled `title`. This build has no window
/// support, so only a warning is logged.
#[cfg(not(feature = "show"))]
pub fn show(canvas: &Canvas, title: &str) -> PlotResult<()> {
    log::warn!(
        "cannot show '{}' ({}x{}): built without the `show` feature",
        title,
        canvas.width(),
        canvas.height()
    );
    Ok(())
}
