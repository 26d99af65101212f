use std::path::PathBuf;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::config::ToolConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::event::CanvasEvent;
use crate::file_handler;
use crate::input::InputHandler;
use crate::panels;
use crate::preview::PREVIEW_INTERVAL;
use crate::stamp::{STAMP_DIR, StampLibrary};
use crate::task::{self, TaskHandle, TaskStatus};
use crate::texture_manager::CanvasTexture;
use crate::tools::Mode;

/// Host settings restored between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PaintSettings {
    pub primary: String,
    pub secondary: Option<String>,
    pub mode: Mode,
    pub tool: ToolConfig,
    pub stamp_dir: PathBuf,
}

impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            primary: "#000000".to_string(),
            secondary: None,
            mode: Mode::default(),
            tool: ToolConfig::default(),
            stamp_dir: PathBuf::from(STAMP_DIR),
        }
    }
}

/// Background work the UI is waiting on
enum PendingJob {
    Open(TaskHandle<DynamicImage>),
    Save(TaskHandle<PathBuf>),
    Stamps(TaskHandle<StampLibrary>),
}

pub struct PaintApp {
    pub(crate) canvas: Canvas,
    pub(crate) settings: PaintSettings,
    pub(crate) input: InputHandler,
    pub(crate) texture: CanvasTexture,
    jobs: Vec<PendingJob>,
    last_tick: f64,
    error: Option<String>,
    pub(crate) status: String,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> CanvasResult<Self> {
        let settings: PaintSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: PaintSettings) -> CanvasResult<Self> {
        let mut canvas = Canvas::new()?;
        canvas.set_tool_config(settings.tool.clone());
        if let Err(e) = canvas.set_primary_color(&settings.primary) {
            log::warn!("Ignoring saved primary color: {e}");
        }
        if let Some(secondary) = &settings.secondary {
            if let Err(e) = canvas.set_secondary_color(secondary) {
                log::warn!("Ignoring saved secondary color: {e}");
            }
        }
        canvas.initialize();
        canvas.set_mode(settings.mode);
        canvas.drain_events();

        let mut app = Self {
            canvas,
            settings,
            input: InputHandler::new(),
            texture: CanvasTexture::new(),
            jobs: Vec::new(),
            last_tick: 0.0,
            error: None,
            status: String::new(),
        };
        app.reload_stamps();
        Ok(app)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.canvas.set_mode(mode);
        self.settings.mode = mode;
    }

    pub fn set_primary(&mut self, hex: &str) {
        match self.canvas.set_primary_color(hex) {
            Ok(()) => self.settings.primary = hex.to_string(),
            Err(e) => self.show_error(e),
        }
    }

    pub fn set_secondary(&mut self, hex: &str) {
        match self.canvas.set_secondary_color(hex) {
            Ok(()) => self.settings.secondary = Some(hex.to_string()),
            Err(e) => self.show_error(e),
        }
    }

    pub fn show_error(&mut self, error: CanvasError) {
        log::error!("{error}");
        self.error = Some(error.to_string());
    }

    pub fn open_image(&mut self, path: PathBuf) {
        self.status = format!("Opening {}", path.display());
        self.jobs.push(PendingJob::Open(task::spawn("open-image", move || {
            file_handler::open_image(&path)
        })));
    }

    pub fn open_image_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &file_handler::IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open_image(path);
        }
    }

    pub fn save_image_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("untitled.png")
            .add_filter("PNG Image", &["png"])
            .save_file()
        else {
            return;
        };
        let image = self.canvas.surface().to_rgba_image();
        self.status = format!("Saving {}", path.display());
        self.jobs.push(PendingJob::Save(task::spawn("save-image", move || {
            file_handler::save_png(&path, &image)?;
            Ok(path)
        })));
    }

    pub fn copy_to_clipboard(&mut self) {
        let result = self.canvas.clipboard_image().and_then(|image| {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_image(arboard::ImageData {
                width: image.width() as usize,
                height: image.height() as usize,
                bytes: std::borrow::Cow::Borrowed(image.as_raw()),
            })?;
            Ok((image.width(), image.height()))
        });
        match result {
            Ok((w, h)) => self.status = format!("Copied {w}x{h} to the clipboard"),
            Err(e) => self.show_error(e),
        }
    }

    pub fn reload_stamps(&mut self) {
        let dir = self.settings.stamp_dir.clone();
        self.jobs.push(PendingJob::Stamps(task::spawn("load-stamps", move || {
            StampLibrary::load_dir(dir)
        })));
    }

    /// Collect finished background jobs
    fn poll_jobs(&mut self, ctx: &egui::Context) {
        let mut still_pending = Vec::new();
        for job in std::mem::take(&mut self.jobs) {
            match job {
                PendingJob::Open(mut handle) => match handle.poll() {
                    TaskStatus::Pending => still_pending.push(PendingJob::Open(handle)),
                    TaskStatus::Finished(Ok(image)) => {
                        self.canvas.load_image(&image);
                        self.status = "Image opened".to_string();
                    }
                    TaskStatus::Finished(Err(e)) => self.show_error(e),
                    TaskStatus::Lost => {
                        self.show_error(CanvasError::TaskLost(handle.name().to_string()))
                    }
                },
                PendingJob::Save(mut handle) => match handle.poll() {
                    TaskStatus::Pending => still_pending.push(PendingJob::Save(handle)),
                    TaskStatus::Finished(Ok(path)) => {
                        self.status = format!("Saved {}", path.display())
                    }
                    TaskStatus::Finished(Err(e)) => self.show_error(e),
                    TaskStatus::Lost => {
                        self.show_error(CanvasError::TaskLost(handle.name().to_string()))
                    }
                },
                PendingJob::Stamps(mut handle) => match handle.poll() {
                    TaskStatus::Pending => still_pending.push(PendingJob::Stamps(handle)),
                    TaskStatus::Finished(Ok(stamps)) => self.canvas.set_stamps(stamps),
                    // A missing stamp directory only disables the stamp tool
                    TaskStatus::Finished(Err(e)) => log::warn!("{e}"),
                    TaskStatus::Lost => {
                        self.show_error(CanvasError::TaskLost(handle.name().to_string()))
                    }
                },
            }
        }
        self.jobs = still_pending;
        if !self.jobs.is_empty() {
            ctx.request_repaint_after(PREVIEW_INTERVAL);
        }
    }

    /// Drive the preview ticker from the frame loop
    fn tick_preview(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if !self.canvas.is_preview_running() {
            self.last_tick = now;
            return;
        }
        if now - self.last_tick >= PREVIEW_INTERVAL.as_secs_f64() {
            self.canvas.tick();
            self.last_tick = now;
        }
        ctx.request_repaint_after(PREVIEW_INTERVAL);
    }

    /// Mirror dropper picks into the persisted settings
    fn handle_canvas_events(&mut self) {
        for event in self.canvas.drain_events() {
            match event {
                CanvasEvent::PrimaryColorChanged(hex) => self.settings.primary = hex,
                CanvasEvent::SecondaryColorChanged(hex) => self.settings.secondary = Some(hex),
                CanvasEvent::SelectionLocked { .. } => {
                    self.status = "Selection ready, use Edit > Copy".to_string();
                }
                CanvasEvent::TextCommitted { .. } | CanvasEvent::ModeChanged { .. } => {}
            }
        }
        self.settings.tool = self.canvas.config().clone();
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        self.canvas.initialize();
                        ui.close_menu();
                    }
                    if ui.button("Open…").clicked() {
                        ui.close_menu();
                        self.open_image_dialog();
                    }
                    if ui.button("Save…").clicked() {
                        ui.close_menu();
                        self.save_image_dialog();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui.button("Copy").clicked() {
                        ui.close_menu();
                        self.copy_to_clipboard();
                    }
                    if ui.button("Clear").clicked() {
                        self.canvas.reset();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Image", |ui| {
                    if ui.button("Invert").clicked() {
                        self.canvas.invert();
                        ui.close_menu();
                    }
                    if ui.button("Flip horizontal").clicked() {
                        self.canvas.flip_horizontal();
                        ui.close_menu();
                    }
                    if ui.button("Flip vertical").clicked() {
                        self.canvas.flip_vertical();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.error else {
            return;
        };
        let mut close = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        if close {
            self.error = None;
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs(ctx);

        if let Some(path) = file_handler::dropped_image(ctx) {
            self.open_image(path);
        }

        self.menu_bar(ctx);
        panels::tools_panel(self, ctx);
        panels::palette_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.tick_preview(ctx);
        self.handle_canvas_events();
        file_handler::preview_files_being_dropped(ctx);
        self.error_modal(ctx);
    }
}
