use crate::PaintApp;
use crate::texture_manager::color_image;
use crate::tools::Mode;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (width, height) = (app.canvas.surface().width(), app.canvas.surface().height());
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(width as f32, height as f32),
            egui::Sense::click_and_drag(),
        );
        if response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        app.input.set_canvas_rect(rect, width, height);
        let capture_keys = app.canvas.mode() == Mode::Text;
        for input in app.input.process_input(ctx, capture_keys) {
            app.canvas.handle(input);
        }

        let canvas = &app.canvas;
        let texture = app
            .texture
            .get_or_update(ctx, canvas.version(), || color_image(&canvas.composite()));
        ui.painter().image(
            texture,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    });
}
