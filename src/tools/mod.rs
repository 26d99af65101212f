use std::fmt;
use std::str::FromStr;

use egui::{PointerButton, Pos2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::color::ColorState;
use crate::config::ToolConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::event::EventBus;
use crate::preview::PreviewLayer;
use crate::selection::Selection;
use crate::stamp::StampLibrary;
use crate::surface::Surface;
use crate::text::FontBook;

mod click;
mod freehand;
mod poly;
mod select_rect;
mod shape;
mod text_tool;

pub use click::{DropperTool, FillTool, StampTool};
pub use freehand::{
    BRUSH_MULT, ERASER_WIDTH, FreehandKind, FreehandTool, SPRAY_PAINT_MULT, SPRAY_PAINT_N,
};
pub use poly::{PolyKind, PolyTool};
pub use select_rect::SelectRectTool;
pub use shape::{ShapeKind, ShapeTool};
pub use text_tool::TextTool;

/// The sixteen mutually exclusive canvas modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "selectpoly")]
    SelectPolygon,
    #[serde(rename = "selectrect")]
    SelectRect,
    #[serde(rename = "eraser")]
    Eraser,
    #[serde(rename = "fill")]
    Fill,
    #[serde(rename = "dropper")]
    Dropper,
    #[serde(rename = "stamp")]
    Stamp,
    #[serde(rename = "pen")]
    Pen,
    #[serde(rename = "brush")]
    Brush,
    #[serde(rename = "spray")]
    Spray,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "polyline")]
    Polyline,
    #[serde(rename = "rect")]
    #[default]
    Rect,
    #[serde(rename = "polygon")]
    Polygon,
    #[serde(rename = "ellipse")]
    Ellipse,
    #[serde(rename = "roundrect")]
    RoundRect,
}

impl Mode {
    /// Toolbar order
    pub const ALL: [Mode; 16] = [
        Mode::SelectPolygon,
        Mode::SelectRect,
        Mode::Eraser,
        Mode::Fill,
        Mode::Dropper,
        Mode::Stamp,
        Mode::Pen,
        Mode::Brush,
        Mode::Spray,
        Mode::Text,
        Mode::Line,
        Mode::Polyline,
        Mode::Rect,
        Mode::Polygon,
        Mode::Ellipse,
        Mode::RoundRect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::SelectPolygon => "selectpoly",
            Mode::SelectRect => "selectrect",
            Mode::Eraser => "eraser",
            Mode::Fill => "fill",
            Mode::Dropper => "dropper",
            Mode::Stamp => "stamp",
            Mode::Pen => "pen",
            Mode::Brush => "brush",
            Mode::Spray => "spray",
            Mode::Text => "text",
            Mode::Line => "line",
            Mode::Polyline => "polyline",
            Mode::Rect => "rect",
            Mode::Polygon => "polygon",
            Mode::Ellipse => "ellipse",
            Mode::RoundRect => "roundrect",
        }
    }

    /// Human-readable label for tool buttons
    pub fn label(self) -> &'static str {
        match self {
            Mode::SelectPolygon => "Select polygon",
            Mode::SelectRect => "Select rectangle",
            Mode::Eraser => "Eraser",
            Mode::Fill => "Fill",
            Mode::Dropper => "Dropper",
            Mode::Stamp => "Stamp",
            Mode::Pen => "Pen",
            Mode::Brush => "Brush",
            Mode::Spray => "Spray",
            Mode::Text => "Text",
            Mode::Line => "Line",
            Mode::Polyline => "Polyline",
            Mode::Rect => "Rectangle",
            Mode::Polygon => "Polygon",
            Mode::Ellipse => "Ellipse",
            Mode::RoundRect => "Rounded rectangle",
        }
    }

    pub fn is_selection(self) -> bool {
        matches!(self, Mode::SelectPolygon | Mode::SelectRect)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| CanvasError::UnknownMode(s.to_string()))
    }
}

/// A pointer press, release or double-click on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in canvas pixel coordinates, possibly outside the buffer
    pub pos: Pos2,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(pos: Pos2, button: PointerButton) -> Self {
        Self { pos, button }
    }

    pub fn primary(x: f32, y: f32) -> Self {
        Self::new(Pos2::new(x, y), PointerButton::Primary)
    }

    pub fn secondary(x: f32, y: f32) -> Self {
        Self::new(Pos2::new(x, y), PointerButton::Secondary)
    }
}

/// Keyboard input relevant to the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Text(String),
    Backspace,
}

/// Where a selection tool stands, as seen by copy
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStatus {
    /// The active tool does not select
    NotSelecting,
    /// Selecting, but the gesture has not been locked
    Pending,
    Locked(Selection),
}

/// Everything a tool reads or mutates while handling an event
///
/// Owned by the single canvas instance; tools receive it by mutable
/// reference and never keep it.
#[derive(Debug)]
pub struct ToolContext {
    pub surface: Surface,
    pub preview: PreviewLayer,
    pub colors: ColorState,
    pub config: ToolConfig,
    pub stamps: StampLibrary,
    pub fonts: FontBook,
    pub events: EventBus,
    pub rng: StdRng,
    version: u64,
}

impl ToolContext {
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        let colors = ColorState::default();
        Ok(Self {
            surface: Surface::new(width, height, colors.background())?,
            preview: PreviewLayer::new(width, height)?,
            colors,
            config: ToolConfig::default(),
            stamps: StampLibrary::new(),
            fonts: FontBook::new(),
            events: EventBus::new(),
            rng: StdRng::from_entropy(),
            version: 0,
        })
    }

    /// Record a visible change so hosts know to redraw
    pub fn mark_modified(&mut self) {
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// The capability set every mode implements
///
/// Every handler defaults to a no-op, so events a mode has no use for are
/// silently ignored.
pub trait Tool {
    fn mode(&self) -> Mode;

    /// True when no gesture is in progress
    fn is_idle(&self) -> bool;

    fn on_pointer_down(&mut self, _event: PointerEvent, _ctx: &mut ToolContext) {}

    fn on_pointer_move(&mut self, _pos: Pos2, _ctx: &mut ToolContext) {}

    fn on_pointer_up(&mut self, _event: PointerEvent, _ctx: &mut ToolContext) {}

    fn on_double_click(&mut self, _event: PointerEvent, _ctx: &mut ToolContext) {}

    fn on_key(&mut self, _key: &KeyInput, _ctx: &mut ToolContext) {}

    /// One preview frame; `final_tick` erases without drawing a new frame
    fn on_tick(&mut self, _final_tick: bool, _ctx: &mut ToolContext) {}

    fn selection(&self) -> SelectionStatus {
        SelectionStatus::NotSelecting
    }

    /// Stop the preview ticker, running the final erase tick if it was live
    fn stop_preview(&mut self, ctx: &mut ToolContext) {
        if ctx.preview.stop() {
            self.on_tick(true, ctx);
            ctx.mark_modified();
        }
    }
}

/// Closed set of tools, one variant per family of modes
#[derive(Debug, Clone)]
pub enum ToolType {
    Freehand(FreehandTool),
    Shape(ShapeTool),
    Poly(PolyTool),
    SelectRect(SelectRectTool),
    Fill(FillTool),
    Dropper(DropperTool),
    Stamp(StampTool),
    Text(TextTool),
}

impl ToolType {
    /// Fresh tool with no gesture state for `mode`
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::SelectPolygon => Self::Poly(PolyTool::new(PolyKind::SelectPolygon)),
            Mode::SelectRect => Self::SelectRect(SelectRectTool::new()),
            Mode::Eraser => Self::Freehand(FreehandTool::new(FreehandKind::Eraser)),
            Mode::Fill => Self::Fill(FillTool),
            Mode::Dropper => Self::Dropper(DropperTool),
            Mode::Stamp => Self::Stamp(StampTool),
            Mode::Pen => Self::Freehand(FreehandTool::new(FreehandKind::Pen)),
            Mode::Brush => Self::Freehand(FreehandTool::new(FreehandKind::Brush)),
            Mode::Spray => Self::Freehand(FreehandTool::new(FreehandKind::Spray)),
            Mode::Text => Self::Text(TextTool::new()),
            Mode::Line => Self::Shape(ShapeTool::new(ShapeKind::Line)),
            Mode::Polyline => Self::Poly(PolyTool::new(PolyKind::Polyline)),
            Mode::Rect => Self::Shape(ShapeTool::new(ShapeKind::Rect)),
            Mode::Polygon => Self::Poly(PolyTool::new(PolyKind::Polygon)),
            Mode::Ellipse => Self::Shape(ShapeTool::new(ShapeKind::Ellipse)),
            Mode::RoundRect => Self::Shape(ShapeTool::new(ShapeKind::RoundRect)),
        }
    }
}

impl Default for ToolType {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

macro_rules! dispatch {
    ($self:ident, $tool:ident => $call:expr) => {
        match $self {
            ToolType::Freehand($tool) => $call,
            ToolType::Shape($tool) => $call,
            ToolType::Poly($tool) => $call,
            ToolType::SelectRect($tool) => $call,
            ToolType::Fill($tool) => $call,
            ToolType::Dropper($tool) => $call,
            ToolType::Stamp($tool) => $call,
            ToolType::Text($tool) => $call,
        }
    };
}

impl Tool for ToolType {
    fn mode(&self) -> Mode {
        dispatch!(self, tool => tool.mode())
    }

    fn is_idle(&self) -> bool {
        dispatch!(self, tool => tool.is_idle())
    }

    fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_pointer_down(event, ctx))
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_pointer_move(pos, ctx))
    }

    fn on_pointer_up(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_pointer_up(event, ctx))
    }

    fn on_double_click(&mut self, event: PointerEvent, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_double_click(event, ctx))
    }

    fn on_key(&mut self, key: &KeyInput, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_key(key, ctx))
    }

    fn on_tick(&mut self, final_tick: bool, ctx: &mut ToolContext) {
        dispatch!(self, tool => tool.on_tick(final_tick, ctx))
    }

    fn selection(&self) -> SelectionStatus {
        dispatch!(self, tool => tool.selection())
    }
}
