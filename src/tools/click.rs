//! Single-click tools: fill, dropper and stamp.

use egui::{Color32, PointerButton};
use tiny_skia::{PixmapPaint, Transform};

use crate::color;
use crate::event::CanvasEvent;
use crate::fill;
use crate::tools::{Mode, PointerEvent, Tool, ToolContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn mode(&self) -> Mode {
        Mode::Fill
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        let color = ctx.colors.for_button(event.button);
        let report = fill::flood_fill(&mut ctx.surface, event.pos, color);
        if report.changed > 0 {
            ctx.mark_modified();
        }
    }
}

/// Picks the clicked pixel into the primary (left) or secondary (right) color
#[derive(Debug, Clone, Copy, Default)]
pub struct DropperTool;

impl Tool for DropperTool {
    fn mode(&self) -> Mode {
        Mode::Dropper
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        let (x, y) = ctx.surface.clamp(event.pos);
        let Some(picked) = ctx.surface.pixel(x, y) else {
            return;
        };
        let [r, g, b, _] = picked.to_srgba_unmultiplied();
        let picked = Color32::from_rgb(r, g, b);
        let hex = color::to_hex(picked);

        match event.button {
            PointerButton::Primary => {
                ctx.colors.primary = picked;
                ctx.events.emit(CanvasEvent::PrimaryColorChanged(hex));
            }
            PointerButton::Secondary => {
                ctx.colors.secondary = Some(picked);
                ctx.events.emit(CanvasEvent::SecondaryColorChanged(hex));
            }
            _ => {}
        }
    }
}

/// Places the current stamp centered on the click
#[derive(Debug, Clone, Copy, Default)]
pub struct StampTool;

impl Tool for StampTool {
    fn mode(&self) -> Mode {
        Mode::Stamp
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        let Some(stamp) = ctx.stamps.current() else {
            log::debug!("No stamp loaded");
            return;
        };
        let x = event.pos.x as i32 - (stamp.width() / 2) as i32;
        let y = event.pos.y as i32 - (stamp.height() / 2) as i32;
        ctx.surface.pixmap_mut().draw_pixmap(
            x,
            y,
            stamp.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        ctx.mark_modified();
    }
}
