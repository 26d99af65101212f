use egui::Pos2;
use image::RgbaImage;
use tiny_skia::{FillRule, IntRect, Mask, Pixmap, PixmapPaint, Transform};

use crate::error::{CanvasError, CanvasResult};
use crate::raster;
use crate::surface::Surface;

/// A region of the canvas picked by one of the selection tools
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Rectangle spanned by the drag origin and the current pointer position
    Rect { origin: Pos2, current: Pos2 },
    /// Closed polygon through the clicked vertices
    Polygon { points: Vec<Pos2> },
}

impl Selection {
    /// Pixel bounds of the selection, `[min, max)` on both axes
    pub fn bounds(&self) -> Option<IntRect> {
        let (min, max) = match self {
            Self::Rect { origin, current } => (origin.min(*current), origin.max(*current)),
            Self::Polygon { points } => {
                let first = *points.first()?;
                points
                    .iter()
                    .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)))
            }
        };
        let (x0, y0) = (min.x.floor() as i32, min.y.floor() as i32);
        let (x1, y1) = (max.x.floor() as i32, max.y.floor() as i32);
        IntRect::from_ltrb(x0, y0, x1, y1)
    }

    /// Extract the selected pixels
    ///
    /// Polygon selections keep only pixels inside the polygon; everything
    /// else inside the bounding rectangle comes back fully transparent.
    pub fn copy(&self, surface: &Surface) -> CanvasResult<RgbaImage> {
        let bounds = self.bounds().ok_or(CanvasError::EmptySelection)?;
        match self {
            Self::Rect { .. } => surface.crop(bounds).ok_or(CanvasError::EmptySelection),
            Self::Polygon { points } => {
                let (width, height) = (surface.width(), surface.height());
                let mut mask = Mask::new(width, height)
                    .ok_or(CanvasError::InvalidDimensions { width, height })?;
                let path = raster::polygon_path(points).ok_or(CanvasError::EmptySelection)?;
                mask.fill_path(&path, FillRule::Winding, false, Transform::identity());

                let mut masked = Pixmap::new(width, height)
                    .ok_or(CanvasError::InvalidDimensions { width, height })?;
                masked.draw_pixmap(
                    0,
                    0,
                    surface.pixmap().as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    Some(&mask),
                );

                Surface::from_pixmap(masked)
                    .crop(bounds)
                    .ok_or(CanvasError::EmptySelection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;
    use image::Rgba;

    fn pos(x: f32, y: f32) -> Pos2 {
        Pos2::new(x, y)
    }

    #[test]
    fn rect_copy_has_drag_size() {
        let surface = Surface::new(600, 400, Color32::WHITE).unwrap();
        let selection = Selection::Rect { origin: pos(10.0, 10.0), current: pos(50.0, 40.0) };
        let image = selection.copy(&surface).unwrap();
        assert_eq!(image.dimensions(), (40, 30));
    }

    #[test]
    fn rect_copy_works_dragging_backwards() {
        let surface = Surface::new(100, 100, Color32::WHITE).unwrap();
        let selection = Selection::Rect { origin: pos(50.0, 40.0), current: pos(10.0, 10.0) };
        assert_eq!(selection.copy(&surface).unwrap().dimensions(), (40, 30));
    }

    #[test]
    fn collapsed_rect_is_empty() {
        let surface = Surface::new(100, 100, Color32::WHITE).unwrap();
        let selection = Selection::Rect { origin: pos(5.0, 5.0), current: pos(5.0, 30.0) };
        assert!(matches!(selection.copy(&surface), Err(CanvasError::EmptySelection)));
    }

    #[test]
    fn triangle_copy_blanks_outside_pixels() {
        let surface = Surface::new(100, 100, Color32::from_rgb(0, 128, 0)).unwrap();
        let selection = Selection::Polygon {
            points: vec![pos(0.0, 0.0), pos(40.0, 0.0), pos(0.0, 40.0)],
        };
        let image = selection.copy(&surface).unwrap();
        assert_eq!(image.dimensions(), (40, 40));
        assert_eq!(*image.get_pixel(2, 2), Rgba([0, 128, 0, 255]));
        assert_eq!(image.get_pixel(38, 38)[3], 0);
    }
}
