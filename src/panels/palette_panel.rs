use crate::PaintApp;
use crate::color::{self, PALETTE};

const SWATCH: egui::Vec2 = egui::vec2(20.0, 20.0);

/// Current colors plus the fixed swatches: left click picks the primary
/// color, right click the secondary
pub fn palette_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("palette_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let colors = *app.canvas.colors();

            let mut primary = colors.primary;
            if ui.color_edit_button_srgba(&mut primary).changed() {
                app.set_primary(&color::to_hex(primary));
            }
            let mut secondary = colors.background();
            if ui.color_edit_button_srgba(&mut secondary).changed() {
                app.set_secondary(&color::to_hex(secondary));
            }
            ui.separator();

            ui.vertical(|ui| {
                for row in PALETTE.chunks(PALETTE.len() / 2) {
                    ui.horizontal(|ui| {
                        for hex in row {
                            let Ok(swatch) = color::parse_hex(hex) else {
                                continue;
                            };
                            let (rect, response) =
                                ui.allocate_exact_size(SWATCH, egui::Sense::click());
                            ui.painter().rect_filled(rect, 2.0, swatch);
                            let response = response.on_hover_text(*hex);
                            if response.clicked() {
                                app.set_primary(hex);
                            } else if response.secondary_clicked() {
                                app.set_secondary(hex);
                            }
                        }
                    });
                }
            });
        });
    });
}
