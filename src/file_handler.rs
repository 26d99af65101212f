use std::path::{Path, PathBuf};

use eframe::egui;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::CanvasResult;

/// Image extensions offered by the open dialog and accepted on drop
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff"];

pub fn open_image(path: impl AsRef<Path>) -> CanvasResult<DynamicImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    log::info!("Opened {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

pub fn save_png(path: impl AsRef<Path>, image: &RgbaImage) -> CanvasResult<()> {
    let path = path.as_ref();
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if a dropped file is an image, by MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else {
        file.path.as_deref().is_some_and(has_image_extension)
    }
}

/// Path of the first image file dropped onto the window this frame
pub fn dropped_image(ctx: &egui::Context) -> Option<PathBuf> {
    ctx.input(|i| {
        for file in &i.raw.dropped_files {
            match &file.path {
                Some(path) if is_image_file(file) => return Some(path.clone()),
                Some(path) => {
                    log::warn!("Dropped file is not a supported image: {}", path.display())
                }
                None => log::warn!("Dropped file {:?} has no path", file.name),
            }
        }
        None
    })
}

/// Dim the window while files are dragged over it
pub fn preview_files_being_dropped(ctx: &egui::Context) {
    use egui::{Align2, Color32, FontId, Id, LayerId, Order};

    let hovered = ctx.input(|i| {
        i.raw
            .hovered_files
            .iter()
            .map(|file| match &file.path {
                Some(path) => path.display().to_string(),
                None => "(path not available)".to_owned(),
            })
            .collect::<Vec<_>>()
    });
    if hovered.is_empty() {
        return;
    }

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        format!("Open image:\n\n{}", hovered.join("\n")),
        FontId::proportional(20.0),
        Color32::WHITE,
    );
}
