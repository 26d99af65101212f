use std::path::Path;

use egui::Pos2;
use image::{DynamicImage, RgbaImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tiny_skia::Pixmap;

use crate::color::{self, ColorState};
use crate::config::{ConfigSetting, MAX_SIZE, MIN_SIZE, ToolConfig};
use crate::error::{CanvasError, CanvasResult};
use crate::event::{CanvasEvent, EventHandler};
use crate::preview::PreviewStats;
use crate::stamp::StampLibrary;
use crate::surface::{CANVAS_HEIGHT, CANVAS_WIDTH, Surface};
use crate::tools::{KeyInput, Mode, PointerEvent, SelectionStatus, Tool, ToolContext, ToolType};

/// One input event, as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasInput {
    PointerDown(PointerEvent),
    PointerMove(Pos2),
    PointerUp(PointerEvent),
    DoubleClick(PointerEvent),
    Key(KeyInput),
}

/// The drawing surface together with the active tool
///
/// Everything here runs on the host's UI thread. While a gesture has the
/// preview running the host is expected to call [`Canvas::tick`] every
/// [`crate::preview::PREVIEW_INTERVAL`].
#[derive(Debug)]
pub struct Canvas {
    ctx: ToolContext,
    tool: ToolType,
}

impl Canvas {
    /// A blank 600x400 canvas in rectangle mode
    pub fn new() -> CanvasResult<Self> {
        Self::with_size(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn with_size(width: u32, height: u32) -> CanvasResult<Self> {
        Ok(Self {
            ctx: ToolContext::new(width, height)?,
            tool: ToolType::default(),
        })
    }

    /// Make spray output reproducible
    pub fn seed_rng(&mut self, seed: u64) {
        self.ctx.rng = StdRng::seed_from_u64(seed);
    }

    /// Clear to the background color derived from the secondary color
    pub fn initialize(&mut self) {
        log::debug!(
            "Initializing canvas with background {}",
            color::to_hex(self.ctx.colors.background())
        );
        self.reset();
    }

    /// Abandon any gesture and refill the buffer with the background color
    pub fn reset(&mut self) {
        self.restart_tool();
        let background = self.ctx.colors.background();
        self.ctx.surface.fill(background);
        self.ctx.mark_modified();
    }

    fn restart_tool(&mut self) {
        // Stale ticks must not paint once the gesture is gone
        self.tool.stop_preview(&mut self.ctx);
        self.tool = ToolType::for_mode(self.tool.mode());
    }

    /// Switch modes, resetting all gesture state even when `mode` is unchanged
    pub fn set_mode(&mut self, mode: Mode) {
        let from = self.tool.mode();
        self.tool.stop_preview(&mut self.ctx);
        self.tool = ToolType::for_mode(mode);
        log::debug!("Mode {from} -> {mode}");
        if from != mode {
            self.ctx.events.emit(CanvasEvent::ModeChanged { from, to: mode });
        }
    }

    pub fn mode(&self) -> Mode {
        self.tool.mode()
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn colors(&self) -> &ColorState {
        &self.ctx.colors
    }

    pub fn set_primary_color(&mut self, hex: &str) -> CanvasResult<()> {
        self.ctx.colors.primary = color::parse_hex(hex)?;
        Ok(())
    }

    pub fn set_secondary_color(&mut self, hex: &str) -> CanvasResult<()> {
        self.ctx.colors.secondary = Some(color::parse_hex(hex)?);
        Ok(())
    }

    /// Set a named configuration key, e.g. `("size", "4")`
    pub fn set_config(&mut self, key: &str, value: &str) -> CanvasResult<()> {
        let setting = ConfigSetting::parse(key, value)?;
        self.apply_setting(setting);
        Ok(())
    }

    pub fn apply_setting(&mut self, setting: ConfigSetting) {
        log::trace!("Config change: {setting:?}");
        self.ctx.config.apply(setting);
    }

    /// Replace the whole configuration, clamping sizes into their ranges
    pub fn set_tool_config(&mut self, mut config: ToolConfig) {
        config.size = config.size.clamp(MIN_SIZE, MAX_SIZE);
        config.font.size = config.font.size.max(1);
        self.ctx.config = config;
    }

    pub fn config(&self) -> &ToolConfig {
        &self.ctx.config
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        self.tool.on_pointer_down(event, &mut self.ctx);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.tool.on_pointer_move(pos, &mut self.ctx);
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        self.tool.on_pointer_up(event, &mut self.ctx);
    }

    pub fn double_click(&mut self, event: PointerEvent) {
        self.tool.on_double_click(event, &mut self.ctx);
    }

    pub fn key(&mut self, key: KeyInput) {
        self.tool.on_key(&key, &mut self.ctx);
    }

    pub fn handle(&mut self, input: CanvasInput) {
        match input {
            CanvasInput::PointerDown(event) => self.pointer_down(event),
            CanvasInput::PointerMove(pos) => self.pointer_move(pos),
            CanvasInput::PointerUp(event) => self.pointer_up(event),
            CanvasInput::DoubleClick(event) => self.double_click(event),
            CanvasInput::Key(key) => self.key(key),
        }
    }

    /// Advance the preview by one frame; returns false when no preview runs
    pub fn tick(&mut self) -> bool {
        if !self.ctx.preview.is_running() {
            return false;
        }
        self.tool.on_tick(false, &mut self.ctx);
        self.ctx.mark_modified();
        true
    }

    pub fn is_preview_running(&self) -> bool {
        self.ctx.preview.is_running()
    }

    pub fn preview_stats(&self) -> PreviewStats {
        self.ctx.preview.stats()
    }

    /// Extract the locked selection, stopping its outline animation
    pub fn copy_selection(&mut self) -> CanvasResult<RgbaImage> {
        let selection = match self.tool.selection() {
            SelectionStatus::NotSelecting => return Err(CanvasError::NoSelection),
            SelectionStatus::Pending => return Err(CanvasError::SelectionNotLocked),
            SelectionStatus::Locked(selection) => selection,
        };
        self.tool.stop_preview(&mut self.ctx);
        let image = selection.copy(&self.ctx.surface)?;
        log::debug!("Copied {}x{} selection", image.width(), image.height());
        Ok(image)
    }

    /// The locked selection if there is one, otherwise the whole canvas
    pub fn clipboard_image(&mut self) -> CanvasResult<RgbaImage> {
        match self.copy_selection() {
            Err(CanvasError::NoSelection | CanvasError::SelectionNotLocked) => {
                Ok(self.ctx.surface.to_rgba_image())
            }
            result => result,
        }
    }

    /// Committed pixels with the live preview on top, for display
    pub fn composite(&self) -> Pixmap {
        self.ctx.preview.composite(&self.ctx.surface)
    }

    /// Committed pixels only, for saving and copying
    pub fn surface(&self) -> &Surface {
        &self.ctx.surface
    }

    /// Replace the contents with `image`, scaled to cover the canvas
    pub fn load_image(&mut self, image: &DynamicImage) {
        self.restart_tool();
        self.ctx.surface.load_cover(image);
        self.ctx.mark_modified();
    }

    pub fn invert(&mut self) {
        self.ctx.surface.invert();
        self.ctx.mark_modified();
    }

    pub fn flip_horizontal(&mut self) {
        self.ctx.surface.flip_horizontal();
        self.ctx.mark_modified();
    }

    pub fn flip_vertical(&mut self) {
        self.ctx.surface.flip_vertical();
        self.ctx.mark_modified();
    }

    /// Advance to the next stamp; returns its path, `None` without stamps
    pub fn next_stamp(&mut self) -> Option<&Path> {
        self.ctx.stamps.next()?;
        self.ctx.stamps.current_path()
    }

    pub fn stamps(&self) -> &StampLibrary {
        &self.ctx.stamps
    }

    pub fn set_stamps(&mut self, stamps: StampLibrary) {
        self.ctx.stamps = stamps;
    }

    /// Load every image in `dir` as a stamp; returns how many were loaded
    pub fn load_stamps(&mut self, dir: impl AsRef<Path>) -> CanvasResult<usize> {
        let stamps = StampLibrary::load_dir(dir)?;
        let count = stamps.len();
        self.set_stamps(stamps);
        Ok(count)
    }

    /// Once a handler is subscribed, events are no longer queued for
    /// [`Canvas::drain_events`]
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) {
        self.ctx.events.subscribe(handler);
    }

    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        self.ctx.events.drain()
    }

    /// Bumped on every visible change
    pub fn version(&self) -> u64 {
        self.ctx.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn new_canvas_is_white_rect_mode() {
        let canvas = Canvas::new().unwrap();
        assert_eq!(canvas.mode(), Mode::Rect);
        assert_eq!(canvas.surface().width(), CANVAS_WIDTH);
        assert_eq!(canvas.surface().height(), CANVAS_HEIGHT);
        assert_eq!(canvas.surface().pixel(599, 399), Some(Color32::WHITE));
    }

    #[test]
    fn initialize_uses_secondary_as_background() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        canvas.set_secondary_color("#336699").unwrap();
        canvas.initialize();
        assert_eq!(canvas.surface().pixel(5, 5), Some(Color32::from_rgb(0x33, 0x66, 0x99)));
    }

    #[test]
    fn bad_color_leaves_state_alone() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        assert!(canvas.set_primary_color("not a color").is_err());
        assert_eq!(canvas.colors().primary, Color32::BLACK);
    }

    #[test]
    fn tick_is_idle_without_gesture() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        assert!(!canvas.tick());
        assert_eq!(canvas.preview_stats(), PreviewStats::default());
    }

    #[test]
    fn mode_change_is_reported_once() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        canvas.set_mode(Mode::Pen);
        canvas.set_mode(Mode::Pen);
        assert_eq!(
            canvas.drain_events(),
            vec![CanvasEvent::ModeChanged { from: Mode::Rect, to: Mode::Pen }]
        );
    }

    #[test]
    fn copy_requires_a_selection_mode() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        assert!(matches!(canvas.copy_selection(), Err(CanvasError::NoSelection)));
        canvas.set_mode(Mode::SelectRect);
        assert!(matches!(canvas.copy_selection(), Err(CanvasError::SelectionNotLocked)));
        assert_eq!(canvas.clipboard_image().unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn config_keys_reach_the_tools() {
        let mut canvas = Canvas::with_size(10, 10).unwrap();
        canvas.set_config("size", "7").unwrap();
        canvas.set_config("italic", "true").unwrap();
        assert_eq!(canvas.config().size, 7);
        assert!(canvas.config().font.italic);
        assert!(canvas.set_config("zoom", "2").is_err());
    }

    #[test]
    fn restored_config_is_clamped() {
        let mut canvas = Canvas::with_size(40, 40).unwrap();
        let mut stored = ToolConfig::default();
        stored.size = u32::MAX;
        stored.font.size = 0;
        canvas.set_tool_config(stored);
        assert_eq!(canvas.config().size, MAX_SIZE);
        assert_eq!(canvas.config().font.size, 1);

        canvas.seed_rng(7);
        canvas.set_mode(Mode::Spray);
        let before = canvas.version();
        canvas.pointer_down(PointerEvent::primary(20.0, 20.0));
        canvas.pointer_move(Pos2::new(21.0, 20.0));
        canvas.pointer_up(PointerEvent::primary(21.0, 20.0));
        assert!(canvas.version() > before);
    }
}
