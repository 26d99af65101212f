use crate::PaintApp;
use crate::components::ToolButton;
use crate::config::{ConfigSetting, FONT_SIZES, MAX_SIZE, MIN_SIZE};
use crate::tools::Mode;

const BUTTONS_PER_ROW: usize = 2;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.canvas.mode();
            egui::Grid::new("tool_grid").spacing([4.0, 4.0]).show(ui, |ui| {
                for (i, mode) in Mode::ALL.into_iter().enumerate() {
                    if ToolButton::new(mode, mode == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {mode}");
                        app.set_mode(mode);
                    }
                    if i % BUTTONS_PER_ROW == BUTTONS_PER_ROW - 1 {
                        ui.end_row();
                    }
                }
            });
            ui.separator();

            let mut size = app.canvas.config().size;
            if ui
                .add(egui::Slider::new(&mut size, MIN_SIZE..=MAX_SIZE).text("Size"))
                .changed()
            {
                app.canvas.apply_setting(ConfigSetting::Size(size));
            }
            let mut fill = app.canvas.config().fill;
            if ui.checkbox(&mut fill, "Fill shapes").changed() {
                app.canvas.apply_setting(ConfigSetting::Fill(fill));
            }

            match app.canvas.mode() {
                Mode::Text => {
                    ui.separator();
                    font_controls(app, ui);
                }
                Mode::Stamp => {
                    ui.separator();
                    stamp_controls(app, ui);
                }
                _ => {}
            }

            if !app.status.is_empty() {
                ui.separator();
                ui.small(&app.status);
            }
        });
}

fn font_controls(app: &mut PaintApp, ui: &mut egui::Ui) {
    let font = app.canvas.config().font.clone();

    let mut family = font.family.clone();
    ui.horizontal(|ui| {
        ui.label("Font");
        if ui.text_edit_singleline(&mut family).lost_focus() && family != font.family {
            if let Ok(setting) = ConfigSetting::parse("font", &family) {
                app.canvas.apply_setting(setting);
            }
        }
    });

    let mut font_size = font.size;
    egui::ComboBox::from_label("Size")
        .selected_text(font_size.to_string())
        .show_ui(ui, |ui| {
            for size in FONT_SIZES {
                ui.selectable_value(&mut font_size, size, size.to_string());
            }
        });
    if font_size != font.size {
        app.canvas.apply_setting(ConfigSetting::FontSize(font_size));
    }

    ui.horizontal(|ui| {
        let mut bold = font.bold;
        if ui.toggle_value(&mut bold, "B").changed() {
            app.canvas.apply_setting(ConfigSetting::Bold(bold));
        }
        let mut italic = font.italic;
        if ui.toggle_value(&mut italic, "I").changed() {
            app.canvas.apply_setting(ConfigSetting::Italic(italic));
        }
        let mut underline = font.underline;
        if ui.toggle_value(&mut underline, "U").changed() {
            app.canvas.apply_setting(ConfigSetting::Underline(underline));
        }
    });
}

fn stamp_controls(app: &mut PaintApp, ui: &mut egui::Ui) {
    let current = app
        .canvas
        .stamps()
        .current_path()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned());
    match current {
        Some(name) => ui.label(format!("Stamp: {name}")),
        None => ui.label("No stamps loaded"),
    };
    ui.horizontal(|ui| {
        if ui.button("Next stamp").clicked() {
            app.canvas.next_stamp();
        }
        if ui.button("Reload").clicked() {
            app.reload_stamps();
        }
    });
}
