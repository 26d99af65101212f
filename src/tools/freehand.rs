use egui::{Pos2, Vec2};
use rand_distr::{Distribution, Normal};

use crate::raster::{self, PenStyle};
use crate::tools::{Mode, PointerEvent, Tool, ToolContext};

/// Brush width as a multiple of the configured size
pub const BRUSH_MULT: u32 = 3;
/// Spray spread (standard deviation) as a multiple of the configured size
pub const SPRAY_PAINT_MULT: u32 = 5;
/// Spray dots per move event as a multiple of the configured size
pub const SPRAY_PAINT_N: u32 = 100;
/// Eraser width, independent of the configured size
pub const ERASER_WIDTH: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreehandKind {
    Pen,
    Brush,
    Spray,
    Eraser,
}

/// Tools that paint straight onto the surface while the pointer moves
#[derive(Debug, Clone)]
pub struct FreehandTool {
    kind: FreehandKind,
    last_pos: Option<Pos2>,
    color: tiny_skia::Color,
}

impl FreehandTool {
    pub fn new(kind: FreehandKind) -> Self {
        Self {
            kind,
            last_pos: None,
            color: tiny_skia::Color::BLACK,
        }
    }

    fn spray(&self, center: Pos2, ctx: &mut ToolContext) {
        let size = ctx.config.size;
        let normal = match Normal::new(0.0f32, (size * SPRAY_PAINT_MULT) as f32) {
            Ok(normal) => normal,
            Err(e) => {
                log::warn!("Spray distribution rejected size {size}: {e}");
                return;
            }
        };
        for _ in 0..size * SPRAY_PAINT_N {
            let offset = Vec2::new(normal.sample(&mut ctx.rng), normal.sample(&mut ctx.rng));
            raster::dot(ctx.surface.pixmap_mut(), center + offset, self.color);
        }
    }
}

impl Tool for FreehandTool {
    fn mode(&self) -> Mode {
        match self.kind {
            FreehandKind::Pen => Mode::Pen,
            FreehandKind::Brush => Mode::Brush,
            FreehandKind::Spray => Mode::Spray,
            FreehandKind::Eraser => Mode::Eraser,
        }
    }

    fn is_idle(&self) -> bool {
        self.last_pos.is_none()
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        self.color = match self.kind {
            FreehandKind::Eraser => ctx.colors.eraser(),
            _ => raster::skia_color(ctx.colors.for_button(event.button)),
        };
        self.last_pos = Some(event.pos);
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext) {
        let Some(last) = self.last_pos else {
            return;
        };
        let size = ctx.config.size as f32;
        let pixmap = ctx.surface.pixmap_mut();
        match self.kind {
            FreehandKind::Pen => {
                let stroke = raster::stroke(size, PenStyle::Pen);
                raster::segment(pixmap, last, pos, self.color, &stroke);
            }
            FreehandKind::Brush => {
                let width = size * BRUSH_MULT as f32;
                let stroke = raster::stroke(width, PenStyle::Round);
                raster::segment(pixmap, last, pos, self.color, &stroke);
            }
            FreehandKind::Eraser => {
                let stroke = raster::stroke(ERASER_WIDTH, PenStyle::Round);
                raster::segment(pixmap, last, pos, self.color, &stroke);
            }
            FreehandKind::Spray => self.spray(pos, ctx),
        }
        self.last_pos = Some(pos);
        ctx.mark_modified();
    }

    fn on_pointer_up(&mut self, _event: PointerEvent, _ctx: &mut ToolContext) {
        self.last_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn context() -> ToolContext {
        ToolContext::new(100, 100).unwrap()
    }

    fn colored(ctx: &ToolContext, color: Color32) -> usize {
        let mut count = 0;
        for y in 0..ctx.surface.height() {
            for x in 0..ctx.surface.width() {
                if ctx.surface.pixel(x, y) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn moves_without_press_draw_nothing() {
        let mut ctx = context();
        let mut pen = FreehandTool::new(FreehandKind::Pen);
        pen.on_pointer_move(Pos2::new(10.0, 10.0), &mut ctx);
        assert_eq!(colored(&ctx, Color32::BLACK), 0);
        assert_eq!(ctx.version(), 0);
    }

    #[test]
    fn pen_draws_between_positions() {
        let mut ctx = context();
        let mut pen = FreehandTool::new(FreehandKind::Pen);
        pen.on_pointer_down(PointerEvent::primary(10.5, 10.5), &mut ctx);
        pen.on_pointer_move(Pos2::new(60.5, 10.5), &mut ctx);
        pen.on_pointer_up(PointerEvent::primary(60.5, 10.5), &mut ctx);

        assert_eq!(ctx.surface.pixel(30, 10), Some(Color32::BLACK));
        assert!(pen.is_idle());
    }

    #[test]
    fn right_button_paints_secondary() {
        let mut ctx = context();
        ctx.colors.secondary = Some(Color32::from_rgb(255, 0, 0));
        let mut brush = FreehandTool::new(FreehandKind::Brush);
        brush.on_pointer_down(PointerEvent::secondary(20.5, 20.5), &mut ctx);
        brush.on_pointer_move(Pos2::new(40.5, 20.5), &mut ctx);
        assert_eq!(ctx.surface.pixel(30, 20), Some(Color32::from_rgb(255, 0, 0)));
    }

    #[test]
    fn brush_is_wider_than_pen() {
        let mut pen_ctx = context();
        let mut brush_ctx = context();
        pen_ctx.config.size = 2;
        brush_ctx.config.size = 2;

        for (kind, ctx) in [
            (FreehandKind::Pen, &mut pen_ctx),
            (FreehandKind::Brush, &mut brush_ctx),
        ] {
            let mut tool = FreehandTool::new(kind);
            tool.on_pointer_down(PointerEvent::primary(20.0, 50.0), ctx);
            tool.on_pointer_move(Pos2::new(80.0, 50.0), ctx);
        }
        assert!(colored(&brush_ctx, Color32::BLACK) > colored(&pen_ctx, Color32::BLACK));
    }

    #[test]
    fn spray_scatters_dots_around_the_pointer() {
        let mut ctx = context();
        let mut spray = FreehandTool::new(FreehandKind::Spray);
        spray.on_pointer_down(PointerEvent::primary(50.0, 50.0), &mut ctx);
        spray.on_pointer_move(Pos2::new(50.0, 50.0), &mut ctx);

        let painted = colored(&ctx, Color32::BLACK);
        assert!(painted > 10, "only {painted} dots landed");
        assert!(painted <= SPRAY_PAINT_N as usize);
    }

    #[test]
    fn eraser_paints_translucent_background() {
        let mut ctx = context();
        ctx.surface.fill(Color32::BLACK);
        let mut eraser = FreehandTool::new(FreehandKind::Eraser);
        eraser.on_pointer_down(PointerEvent::primary(20.0, 50.0), &mut ctx);
        eraser.on_pointer_move(Pos2::new(80.0, 50.0), &mut ctx);

        let erased = ctx.surface.pixel(50, 50).unwrap();
        assert!(erased.r() > 0 && erased.r() < 255, "got {erased:?}");
    }
}
