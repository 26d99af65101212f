use egui::Pos2;

use crate::event::CanvasEvent;
use crate::raster;
use crate::selection::Selection;
use crate::tools::{Mode, PointerEvent, SelectionStatus, Tool, ToolContext};

/// Rubber-band rectangle selection
///
/// Releasing the pointer locks the rectangle; the dashed outline keeps
/// animating until the next press or a mode change.
#[derive(Debug, Clone, Default)]
pub struct SelectRectTool {
    origin: Option<Pos2>,
    current: Pos2,
    dash_offset: f32,
    locked: bool,
}

impl SelectRectTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SelectRectTool {
    fn mode(&self) -> Mode {
        Mode::SelectRect
    }

    fn is_idle(&self) -> bool {
        self.origin.is_none()
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        // A press always starts over, even on a locked selection
        self.origin = Some(event.pos);
        self.current = event.pos;
        self.locked = false;
        ctx.preview.start();
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext) {
        if self.origin.is_some() && !self.locked {
            self.current = pos;
        }
    }

    fn on_pointer_up(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        if self.origin.is_none() || self.locked {
            return;
        }
        self.current = event.pos;
        self.locked = true;
        ctx.events.emit(CanvasEvent::SelectionLocked { mode: Mode::SelectRect });
    }

    fn on_tick(&mut self, final_tick: bool, ctx: &mut ToolContext) {
        let Some(origin) = self.origin else {
            return;
        };
        ctx.preview.erase();
        if final_tick {
            return;
        }
        self.dash_offset -= 1.0;
        if let Some(path) = raster::rect_path(origin, self.current) {
            ctx.preview.draw_path(&path, &raster::preview_stroke(Some(self.dash_offset)));
        }
    }

    fn selection(&self) -> SelectionStatus {
        match self.origin {
            Some(origin) if self.locked => SelectionStatus::Locked(Selection::Rect {
                origin,
                current: self.current,
            }),
            _ => SelectionStatus::Pending,
        }
    }
}
