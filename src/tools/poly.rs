use egui::{PointerButton, Pos2};

use crate::event::CanvasEvent;
use crate::raster::{self, PenStyle};
use crate::selection::Selection;
use crate::tools::{Mode, PointerEvent, SelectionStatus, Tool, ToolContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyKind {
    Polyline,
    Polygon,
    SelectPolygon,
}

/// Click-to-add-vertex tools, finished by a double-click
#[derive(Debug, Clone)]
pub struct PolyTool {
    kind: PolyKind,
    history: Vec<Pos2>,
    current: Pos2,
    dash_offset: f32,
    locked: bool,
}

impl PolyTool {
    pub fn new(kind: PolyKind) -> Self {
        Self {
            kind,
            history: Vec::new(),
            current: Pos2::ZERO,
            dash_offset: 0.0,
            locked: false,
        }
    }

    fn reset(&mut self) {
        self.history.clear();
        self.current = Pos2::ZERO;
        self.dash_offset = 0.0;
        self.locked = false;
    }

    /// Clicked vertices followed by the trailing pointer position
    fn vertices(&self) -> Vec<Pos2> {
        let mut vertices = self.history.clone();
        vertices.push(self.current);
        vertices
    }

    fn commit(&self, ctx: &mut ToolContext) {
        let vertices = self.vertices();
        let size = ctx.config.size as f32;
        let primary = raster::skia_color(ctx.colors.primary);
        let stroke = raster::stroke(size, PenStyle::Round);
        let pixmap = ctx.surface.pixmap_mut();

        match self.kind {
            PolyKind::Polyline => {
                if let Some(path) = raster::polyline_path(&vertices) {
                    raster::stroke_path(pixmap, &path, primary, &stroke);
                }
            }
            PolyKind::Polygon => {
                if let Some(path) = raster::polygon_path(&vertices) {
                    if let (true, Some(fill)) = (ctx.config.fill, ctx.colors.secondary) {
                        raster::fill_path(pixmap, &path, raster::skia_color(fill));
                    }
                    raster::stroke_path(pixmap, &path, primary, &stroke);
                }
            }
            PolyKind::SelectPolygon => return,
        }
        log::debug!("Committed {:?} through {} vertices", self.kind, vertices.len());
        ctx.mark_modified();
    }
}

impl Tool for PolyTool {
    fn mode(&self) -> Mode {
        match self.kind {
            PolyKind::Polyline => Mode::Polyline,
            PolyKind::Polygon => Mode::Polygon,
            PolyKind::SelectPolygon => Mode::SelectPolygon,
        }
    }

    fn is_idle(&self) -> bool {
        self.history.is_empty()
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        match event.button {
            PointerButton::Primary => {
                if self.locked {
                    return;
                }
                if self.history.is_empty() {
                    self.current = event.pos;
                    ctx.preview.start();
                }
                self.history.push(event.pos);
            }
            PointerButton::Secondary if !self.history.is_empty() => {
                self.stop_preview(ctx);
                self.reset();
            }
            _ => {}
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext) {
        if !self.locked && !self.history.is_empty() {
            self.current = pos;
        }
    }

    fn on_double_click(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        if self.history.is_empty() || self.locked {
            return;
        }
        self.current = event.pos;
        if self.kind == PolyKind::SelectPolygon {
            self.locked = true;
            ctx.events.emit(CanvasEvent::SelectionLocked { mode: self.mode() });
            return;
        }
        self.stop_preview(ctx);
        self.commit(ctx);
        self.reset();
    }

    fn on_tick(&mut self, final_tick: bool, ctx: &mut ToolContext) {
        if self.history.is_empty() {
            return;
        }
        ctx.preview.erase();
        if final_tick {
            return;
        }
        self.dash_offset -= 1.0;
        let vertices = self.vertices();
        let (path, stroke) = match self.kind {
            PolyKind::Polyline => (raster::polyline_path(&vertices), raster::preview_stroke(None)),
            PolyKind::Polygon => (raster::polygon_path(&vertices), raster::preview_stroke(None)),
            PolyKind::SelectPolygon => (
                raster::polygon_path(&vertices),
                raster::preview_stroke(Some(self.dash_offset)),
            ),
        };
        if let Some(path) = path {
            ctx.preview.draw_path(&path, &stroke);
        }
    }

    fn selection(&self) -> SelectionStatus {
        match self.kind {
            PolyKind::SelectPolygon if self.locked => SelectionStatus::Locked(Selection::Polygon {
                points: self.vertices(),
            }),
            PolyKind::SelectPolygon => SelectionStatus::Pending,
            _ => SelectionStatus::NotSelecting,
        }
    }
}
