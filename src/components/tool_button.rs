use eframe::egui;

use crate::tools::Mode;

/// Short label drawn on each mode's toolbar button
///
/// Plain ASCII so the bundled fonts always have the glyphs.
pub fn icon(mode: Mode) -> &'static str {
    match mode {
        Mode::SelectPolygon => "SelP",
        Mode::SelectRect => "SelR",
        Mode::Eraser => "Ers",
        Mode::Fill => "Fill",
        Mode::Dropper => "Drop",
        Mode::Stamp => "Stmp",
        Mode::Pen => "Pen",
        Mode::Brush => "Brsh",
        Mode::Spray => "Spry",
        Mode::Text => "Text",
        Mode::Line => "Line",
        Mode::Polyline => "PLn",
        Mode::Rect => "Rect",
        Mode::Polygon => "Poly",
        Mode::Ellipse => "Ell",
        Mode::RoundRect => "RRct",
    }
}

pub struct ToolButton {
    pub mode: Mode,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(mode: Mode, selected: bool) -> Self {
        Self { mode, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                egui::Color32::from_gray(40)
            } else {
                egui::Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                icon(self.mode),
                egui::FontId::proportional(11.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.mode.label())
    }
}
