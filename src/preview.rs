use std::time::Duration;

use tiny_skia::{Path, Pixmap, PixmapPaint, Stroke, Transform};

use crate::error::{CanvasError, CanvasResult};
use crate::raster;
use crate::surface::Surface;

/// How often the host should call [`crate::Canvas::tick`] while a preview runs
pub const PREVIEW_INTERVAL: Duration = Duration::from_millis(100);

/// Counts of erase and draw passes since the layer was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub erases: usize,
    pub draws: usize,
}

/// Overlay holding the live preview frame of an in-progress gesture
///
/// Preview drawing never touches the committed surface. Each frame goes to
/// this overlay, and [`PreviewLayer::composite`] inverts the committed
/// pixels wherever the overlay has coverage.
#[derive(Debug, Clone)]
pub struct PreviewLayer {
    overlay: Pixmap,
    running: bool,
    dirty: bool,
    stats: PreviewStats,
}

impl PreviewLayer {
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        let overlay =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        Ok(Self {
            overlay,
            running: false,
            dirty: false,
            stats: PreviewStats::default(),
        })
    }

    /// Begin ticking for a new gesture
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop ticking; returns whether the caller owes the gesture a final tick
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// First half of every tick: drop the previous frame
    pub fn erase(&mut self) {
        if self.dirty {
            self.overlay.fill(tiny_skia::Color::TRANSPARENT);
            self.dirty = false;
        }
        self.stats.erases += 1;
    }

    /// Second half of a non-final tick: draw the new frame
    pub fn draw_path(&mut self, path: &Path, stroke: &Stroke) {
        raster::stroke_path(&mut self.overlay, path, tiny_skia::Color::WHITE, stroke);
        self.dirty = true;
        self.stats.draws += 1;
    }

    /// Second half of a non-final tick for pre-rendered content (text)
    pub fn draw_pixmap(&mut self, x: i32, y: i32, pixmap: &Pixmap) {
        self.overlay.draw_pixmap(
            x,
            y,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.dirty = true;
        self.stats.draws += 1;
    }

    /// True while nothing is drawn on the overlay
    pub fn is_clear(&self) -> bool {
        self.overlay.pixels().iter().all(|p| p.alpha() == 0)
    }

    pub fn stats(&self) -> PreviewStats {
        self.stats
    }

    pub fn overlay(&self) -> &Pixmap {
        &self.overlay
    }

    /// Committed pixels with the preview frame inverted on top
    pub fn composite(&self, surface: &Surface) -> Pixmap {
        let mut out = surface.pixmap().clone();
        if !self.dirty {
            return out;
        }
        for (dst, cover) in out.pixels_mut().iter_mut().zip(self.overlay.pixels()) {
            if cover.alpha() == 0 {
                continue;
            }
            let c = dst.demultiply();
            *dst = tiny_skia::ColorU8::from_rgba(
                255 - c.red(),
                255 - c.green(),
                255 - c.blue(),
                c.alpha().max(cover.alpha()),
            )
            .premultiply();
        }
        out
    }
}
