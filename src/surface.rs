use egui::{Color32, Pos2};
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use tiny_skia::{ColorU8, IntRect, Pixmap, PremultipliedColorU8};

use crate::error::{CanvasError, CanvasResult};
use crate::raster;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 400;

/// Fixed-size RGBA pixel buffer every tool draws into
///
/// The dimensions are chosen once at creation and never change; loading an
/// image of a different size scales and crops it to fit.
#[derive(Clone, Debug)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32, background: Color32) -> CanvasResult<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        pixmap.fill(raster::skia_color(background));
        Ok(Self { pixmap })
    }

    /// Build a surface holding a copy of `image`, keeping its size
    pub fn from_rgba_image(image: &RgbaImage) -> CanvasResult<Self> {
        let (width, height) = image.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self { pixmap })
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Overwrite every pixel with `color`
    pub fn fill(&mut self, color: Color32) {
        self.pixmap.fill(raster::skia_color(color));
    }

    /// Stored premultiplied value of a pixel, `None` outside the buffer
    pub fn raw_pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    /// Color of a pixel with alpha divided back out
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.raw_pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Map a pointer position onto the nearest pixel inside the buffer
    pub fn clamp(&self, pos: Pos2) -> (u32, u32) {
        let max_x = self.width().saturating_sub(1) as f32;
        let max_y = self.height().saturating_sub(1) as f32;
        let x = pos.x.floor();
        let y = pos.y.floor();
        // NaN positions land on the origin
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, max_x) };
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, max_y) };
        (x as u32, y as u32)
    }

    /// Copy out as a straight-alpha image for codecs and the clipboard
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    /// Copy out the part of `rect` that overlaps the buffer
    pub fn crop(&self, rect: IntRect) -> Option<RgbaImage> {
        let bounds = IntRect::from_xywh(0, 0, self.width(), self.height())?;
        let region = rect.intersect(&bounds)?;
        let region = self.pixmap.clone_rect(region)?;
        Some(Self::from_pixmap(region).to_rgba_image())
    }

    /// Invert the color channels, keeping alpha
    pub fn invert(&mut self) {
        for pixel in self.pixmap.pixels_mut() {
            let c = pixel.demultiply();
            *pixel =
                ColorU8::from_rgba(255 - c.red(), 255 - c.green(), 255 - c.blue(), c.alpha())
                    .premultiply();
        }
    }

    pub fn flip_horizontal(&mut self) {
        let width = self.width() as usize;
        for row in self.pixmap.pixels_mut().chunks_exact_mut(width) {
            row.reverse();
        }
    }

    pub fn flip_vertical(&mut self) {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let pixels = self.pixmap.pixels_mut();
        for y in 0..height / 2 {
            let (top, bottom) = pixels.split_at_mut((height - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }

    /// Replace the contents with `image`, scaled so it covers the whole
    /// buffer and center-cropped along the overflowing axis
    pub fn load_cover(&mut self, image: &DynamicImage) {
        let (cw, ch) = (self.width(), self.height());
        let (iw, ih) = (image.width().max(1), image.height().max(1));

        let (sw, sh) = if (iw as f32 / cw as f32) < (ih as f32 / ch as f32) {
            // Relatively taller: fit the width, crop top and bottom
            let sh = ((ih as u64 * cw as u64) / iw as u64).max(ch as u64) as u32;
            (cw, sh)
        } else {
            let sw = ((iw as u64 * ch as u64) / ih as u64).max(cw as u64) as u32;
            (sw, ch)
        };

        let scaled = image::imageops::resize(&image.to_rgba8(), sw, sh, FilterType::Triangle);
        let x = (sw - cw) / 2;
        let y = (sh - ch) / 2;
        let cropped = image::imageops::crop_imm(&scaled, x, y, cw, ch).to_image();

        for (dst, src) in self.pixmap.pixels_mut().iter_mut().zip(cropped.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        log::debug!("Loaded {iw}x{ih} image onto {cw}x{ch} canvas (scaled to {sw}x{sh})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(4, 3, Color32::WHITE).unwrap()
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            Surface::new(0, 10, Color32::WHITE),
            Err(CanvasError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn clamp_keeps_positions_in_bounds() {
        let s = surface();
        assert_eq!(s.clamp(Pos2::new(-5.0, -1.0)), (0, 0));
        assert_eq!(s.clamp(Pos2::new(10.0, 10.0)), (3, 2));
        assert_eq!(s.clamp(Pos2::new(1.7, 2.2)), (1, 2));
    }

    #[test]
    fn invert_flips_rgb_only() {
        let mut s = surface();
        s.invert();
        assert_eq!(s.pixel(0, 0), Some(Color32::BLACK));
        s.invert();
        assert_eq!(s.pixel(3, 2), Some(Color32::WHITE));
    }

    #[test]
    fn flips_mirror_pixels() {
        let mut image = RgbaImage::from_pixel(4, 3, image::Rgba([255, 255, 255, 255]));
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let mut s = Surface::from_rgba_image(&image).unwrap();

        s.flip_horizontal();
        assert_eq!(s.pixel(3, 0), Some(Color32::from_rgb(255, 0, 0)));
        s.flip_vertical();
        assert_eq!(s.pixel(3, 2), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(s.pixel(0, 0), Some(Color32::WHITE));
    }

    #[test]
    fn crop_clips_to_bounds() {
        let s = surface();
        let rect = IntRect::from_xywh(2, 1, 10, 10).unwrap();
        let cropped = s.crop(rect).unwrap();
        assert_eq!(cropped.dimensions(), (2, 2));
        assert!(s.crop(IntRect::from_xywh(50, 50, 2, 2).unwrap()).is_none());
    }

    #[test]
    fn load_cover_fills_whole_canvas() {
        let mut s = Surface::new(60, 40, Color32::WHITE).unwrap();
        let tall = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            100,
            image::Rgba([0, 0, 255, 255]),
        ));
        s.load_cover(&tall);
        assert_eq!(s.width(), 60);
        assert_eq!(s.pixel(0, 0), Some(Color32::from_rgb(0, 0, 255)));
        assert_eq!(s.pixel(59, 39), Some(Color32::from_rgb(0, 0, 255)));
    }
}
