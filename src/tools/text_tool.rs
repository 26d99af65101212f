use egui::{PointerButton, Pos2};
use tiny_skia::{PixmapPaint, Transform};

use crate::event::CanvasEvent;
use crate::raster;
use crate::tools::{KeyInput, Mode, PointerEvent, Tool, ToolContext};

/// Click to place, type, click again to commit
///
/// The position is the text baseline origin. A right click abandons the
/// text without drawing it.
#[derive(Debug, Clone, Default)]
pub struct TextTool {
    position: Option<Pos2>,
    text: String,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn reset(&mut self) {
        self.position = None;
        self.text.clear();
    }

    fn commit(&self, position: Pos2, ctx: &mut ToolContext) {
        let color = raster::skia_color(ctx.colors.primary);
        let Some(raster) = ctx.fonts.rasterize(&self.text, &ctx.config.font, color) else {
            return;
        };
        ctx.surface.pixmap_mut().draw_pixmap(
            position.x.round() as i32 + raster.left,
            position.y.round() as i32 + raster.top,
            raster.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        ctx.events.emit(CanvasEvent::TextCommitted { text: self.text.clone() });
        ctx.mark_modified();
    }
}

impl Tool for TextTool {
    fn mode(&self) -> Mode {
        Mode::Text
    }

    fn is_idle(&self) -> bool {
        self.position.is_none()
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        match (event.button, self.position) {
            (PointerButton::Primary, None) => {
                self.position = Some(event.pos);
                self.text.clear();
                ctx.preview.start();
            }
            (PointerButton::Primary, Some(position)) => {
                self.stop_preview(ctx);
                self.commit(position, ctx);
                self.reset();
            }
            (PointerButton::Secondary, Some(_)) => {
                self.stop_preview(ctx);
                self.reset();
            }
            _ => {}
        }
    }

    fn on_key(&mut self, key: &KeyInput, _ctx: &mut ToolContext) {
        if self.position.is_none() {
            return;
        }
        match key {
            KeyInput::Text(text) => self.text.push_str(text),
            KeyInput::Backspace => {
                self.text.pop();
            }
        }
    }

    fn on_tick(&mut self, final_tick: bool, ctx: &mut ToolContext) {
        let Some(position) = self.position else {
            return;
        };
        ctx.preview.erase();
        if final_tick {
            return;
        }
        let white = tiny_skia::Color::WHITE;
        let Some(raster) = ctx.fonts.rasterize(&self.text, &ctx.config.font, white) else {
            return;
        };
        ctx.preview.draw_pixmap(
            position.x.round() as i32 + raster.left,
            position.y.round() as i32 + raster.top,
            &raster.pixmap,
        );
    }
}
