use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use tiny_skia::Pixmap;

/// GPU texture mirroring the canvas, re-uploaded only when the canvas
/// version moves
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    version: Option<u64>,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for canvas `version`, calling `generator` only on a miss
    pub fn get_or_update<F>(&mut self, ctx: &Context, version: u64, generator: F) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        if let (Some(handle), true) = (&self.handle, self.version == Some(version)) {
            return handle.id();
        }
        let image = generator();
        let id = match &mut self.handle {
            Some(handle) => {
                handle.set(image, TextureOptions::NEAREST);
                handle.id()
            }
            None => {
                let handle = ctx.load_texture("canvas", image, TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        };
        self.version = Some(version);
        log::trace!("Uploaded canvas texture v{version}");
        id
    }
}

/// Straight-alpha egui image of a premultiplied pixmap
pub fn color_image(pixmap: &Pixmap) -> ColorImage {
    let size = [pixmap.width() as usize, pixmap.height() as usize];
    let pixels = pixmap
        .pixels()
        .iter()
        .map(|p| {
            let c = p.demultiply();
            egui::Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha())
        })
        .collect();
    ColorImage { size, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_image_keeps_size_and_pixels() {
        let mut pixmap = Pixmap::new(3, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        let image = color_image(&pixmap);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[5], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn uploads_only_on_version_change() {
        let ctx = Context::default();
        let mut texture = CanvasTexture::new();
        let mut uploads = 0;
        let mut frame = |version| {
            texture.get_or_update(&ctx, version, || {
                uploads += 1;
                ColorImage::new([2, 2], egui::Color32::WHITE)
            })
        };
        let first = frame(1);
        let second = frame(1);
        frame(2);
        assert_eq!(first, second);
        drop(frame);
        assert_eq!(uploads, 2);
    }
}
