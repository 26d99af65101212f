use egui::{Color32, Pos2};

use crate::raster;
use crate::surface::Surface;

/// What a flood fill touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Pixels in the filled region
    pub visited: usize,
    /// Pixels whose stored value actually changed
    pub changed: usize,
}

/// Paint the 4-connected region of pixels sharing the seed's color
///
/// The seed is clamped into the surface. Every coordinate is pushed at most
/// once, tracked by a visited bitmap, so the region is always the one that
/// existed before painting started, even when `color` equals the seed
/// color.
pub fn flood_fill(surface: &mut Surface, seed: Pos2, color: Color32) -> FillReport {
    let (width, height) = (surface.width() as usize, surface.height() as usize);
    let (sx, sy) = surface.clamp(seed);
    let replacement = raster::premultiplied(color);

    let pixels = surface.pixmap_mut().pixels_mut();
    let start = sy as usize * width + sx as usize;
    let target = pixels[start];

    let mut seen = vec![false; width * height];
    let mut stack = vec![start];
    seen[start] = true;
    let mut report = FillReport::default();

    while let Some(idx) = stack.pop() {
        if pixels[idx] != target {
            continue;
        }
        report.visited += 1;
        if pixels[idx] != replacement {
            pixels[idx] = replacement;
            report.changed += 1;
        }

        let (x, y) = (idx % width, idx / width);
        let mut push = |n: usize| {
            if !seen[n] {
                seen[n] = true;
                stack.push(n);
            }
        };
        if x + 1 < width {
            push(idx + 1);
        }
        if y + 1 < height {
            push(idx + width);
        }
        if x > 0 {
            push(idx - 1);
        }
        if y > 0 {
            push(idx - width);
        }
    }

    log::debug!(
        "Flood fill from ({sx}, {sy}) visited {} pixels, changed {}",
        report.visited,
        report.changed
    );
    report
}
