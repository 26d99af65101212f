use egui::Pos2;
use tiny_skia::Path;

use crate::raster::{self, PenStyle};
use crate::tools::{Mode, PointerEvent, Tool, ToolContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rect,
    Ellipse,
    RoundRect,
}

impl ShapeKind {
    fn path(self, from: Pos2, to: Pos2) -> Option<Path> {
        match self {
            ShapeKind::Line => raster::line_path(from, to),
            ShapeKind::Rect => raster::rect_path(from, to),
            ShapeKind::Ellipse => raster::ellipse_path(from, to),
            ShapeKind::RoundRect => raster::rounded_rect_path(from, to, raster::ROUNDED_RADIUS),
        }
    }
}

#[derive(Debug, Clone)]
struct Drag {
    origin: Pos2,
    current: Pos2,
}

/// Press-drag-release tools with a live outline preview
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    drag: Option<Drag>,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self { kind, drag: None }
    }

    fn commit(&self, origin: Pos2, end: Pos2, ctx: &mut ToolContext) {
        let Some(path) = self.kind.path(origin, end) else {
            log::debug!("Skipping degenerate {:?} from {origin:?} to {end:?}", self.kind);
            return;
        };
        let size = ctx.config.size as f32;
        let primary = raster::skia_color(ctx.colors.primary);
        let pixmap = ctx.surface.pixmap_mut();

        if self.kind == ShapeKind::Line {
            raster::stroke_path(pixmap, &path, primary, &raster::stroke(size, PenStyle::Round));
        } else {
            if let (true, Some(fill)) = (ctx.config.fill, ctx.colors.secondary) {
                raster::fill_path(pixmap, &path, raster::skia_color(fill));
            }
            raster::stroke_path(pixmap, &path, primary, &raster::stroke(size, PenStyle::Outline));
        }
        ctx.mark_modified();
    }
}

impl Tool for ShapeTool {
    fn mode(&self) -> Mode {
        match self.kind {
            ShapeKind::Line => Mode::Line,
            ShapeKind::Rect => Mode::Rect,
            ShapeKind::Ellipse => Mode::Ellipse,
            ShapeKind::RoundRect => Mode::RoundRect,
        }
    }

    fn is_idle(&self) -> bool {
        self.drag.is_none()
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        self.drag = Some(Drag {
            origin: event.pos,
            current: event.pos,
        });
        ctx.preview.start();
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext) {
        if let Some(drag) = &mut self.drag {
            drag.current = pos;
        }
    }

    fn on_pointer_up(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        if self.drag.is_none() {
            return;
        }
        self.stop_preview(ctx);
        if let Some(drag) = self.drag.take() {
            self.commit(drag.origin, event.pos, ctx);
        }
    }

    fn on_tick(&mut self, final_tick: bool, ctx: &mut ToolContext) {
        let Some(drag) = &self.drag else {
            return;
        };
        ctx.preview.erase();
        if !final_tick {
            if let Some(path) = self.kind.path(drag.origin, drag.current) {
                ctx.preview.draw_path(&path, &raster::preview_stroke(None));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn context() -> ToolContext {
        ToolContext::new(100, 100).unwrap()
    }

    #[test]
    fn ticks_draw_into_the_overlay_only() {
        let mut ctx = context();
        let mut rect = ShapeTool::new(ShapeKind::Rect);
        rect.on_pointer_down(PointerEvent::primary(10.5, 10.5), &mut ctx);
        rect.on_pointer_move(Pos2::new(50.5, 40.5), &mut ctx);
        rect.on_tick(false, &mut ctx);

        assert!(!ctx.preview.is_clear());
        assert_eq!(ctx.surface.pixel(30, 10), Some(Color32::WHITE));
    }

    #[test]
    fn release_commits_and_clears_preview() {
        let mut ctx = context();
        ctx.colors.secondary = Some(Color32::from_rgb(0, 0, 255));
        let mut rect = ShapeTool::new(ShapeKind::Rect);
        rect.on_pointer_down(PointerEvent::primary(10.5, 10.5), &mut ctx);
        rect.on_pointer_move(Pos2::new(50.5, 40.5), &mut ctx);
        rect.on_tick(false, &mut ctx);
        rect.on_pointer_up(PointerEvent::primary(50.5, 40.5), &mut ctx);

        assert!(ctx.preview.is_clear());
        assert!(!ctx.preview.is_running());
        assert!(rect.is_idle());
        assert_eq!(ctx.surface.pixel(30, 10), Some(Color32::BLACK));
        assert_eq!(ctx.surface.pixel(30, 25), Some(Color32::from_rgb(0, 0, 255)));

        let stats = ctx.preview.stats();
        assert_eq!(stats.erases, stats.draws + 1);
    }

    #[test]
    fn fill_flag_off_leaves_interior() {
        let mut ctx = context();
        ctx.colors.secondary = Some(Color32::from_rgb(0, 0, 255));
        ctx.config.fill = false;
        let mut ellipse = ShapeTool::new(ShapeKind::Ellipse);
        ellipse.on_pointer_down(PointerEvent::primary(10.0, 10.0), &mut ctx);
        ellipse.on_pointer_up(PointerEvent::primary(90.0, 90.0), &mut ctx);
        assert_eq!(ctx.surface.pixel(50, 50), Some(Color32::WHITE));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut ctx = context();
        let mut line = ShapeTool::new(ShapeKind::Line);
        line.on_pointer_up(PointerEvent::primary(50.0, 50.0), &mut ctx);
        assert_eq!(ctx.version(), 0);
        assert_eq!(ctx.preview.stats().erases, 0);
    }
}
