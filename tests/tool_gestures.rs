use egui::{Color32, Pos2};
use raster_paint::{Canvas, CanvasEvent, CanvasInput, KeyInput, Mode, PointerEvent, Tool};

fn canvas() -> Canvas {
    let mut canvas = Canvas::new().unwrap();
    canvas.seed_rng(7);
    canvas
}

fn non_white(canvas: &Canvas) -> Vec<(u32, u32)> {
    let surface = canvas.surface();
    let mut found = Vec::new();
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.pixel(x, y) != Some(Color32::WHITE) {
                found.push((x, y));
            }
        }
    }
    found
}

fn type_text(canvas: &mut Canvas, text: &str) {
    canvas.key(KeyInput::Text(text.to_string()));
}

#[test]
fn line_commit_leaves_no_preview_residue() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Line);
    canvas.pointer_down(PointerEvent::primary(0.0, 0.0));
    canvas.pointer_move(Pos2::new(10.0, 10.0));
    assert!(canvas.tick());
    canvas.pointer_up(PointerEvent::primary(10.0, 10.0));

    assert!(!canvas.is_preview_running());
    assert_eq!(canvas.composite().data(), canvas.surface().pixmap().data());

    let stats = canvas.preview_stats();
    assert_eq!(stats.erases, stats.draws + 1);

    let inked = non_white(&canvas);
    assert!(!inked.is_empty());
    assert!(inked.iter().all(|&(x, y)| x <= 11 && y <= 11), "ink outside the line: {inked:?}");
}

#[test]
fn every_finished_gesture_erases_once_more_than_it_draws() {
    let mut canvas = canvas();
    for mode in [Mode::Rect, Mode::Ellipse, Mode::RoundRect] {
        canvas.set_mode(mode);
        canvas.pointer_down(PointerEvent::primary(50.0, 50.0));
        for step in 1..=5 {
            canvas.pointer_move(Pos2::new(50.0 + step as f32 * 20.0, 50.0 + step as f32 * 10.0));
            canvas.tick();
        }
        canvas.pointer_up(PointerEvent::primary(150.0, 100.0));
    }
    let stats = canvas.preview_stats();
    assert_eq!(stats.draws, 15);
    assert_eq!(stats.erases, 18);
}

#[test]
fn switching_modes_discards_gesture_state() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Polygon);
    canvas.pointer_down(PointerEvent::primary(10.0, 10.0));
    canvas.pointer_down(PointerEvent::primary(100.0, 10.0));
    canvas.tick();
    assert!(!canvas.tool().is_idle());

    canvas.set_mode(Mode::Rect);
    assert!(!canvas.tick(), "stale tick after mode switch");
    canvas.set_mode(Mode::Polygon);
    assert!(canvas.tool().is_idle());

    let version = canvas.version();
    canvas.double_click(PointerEvent::primary(100.0, 100.0));
    assert_eq!(canvas.version(), version, "double-click without vertices must not draw");
    assert!(non_white(&canvas).is_empty());
}

#[test]
fn reselecting_the_same_mode_resets_it() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Text);
    canvas.pointer_down(PointerEvent::primary(20.0, 50.0));
    type_text(&mut canvas, "lost");
    canvas.set_mode(Mode::Text);
    assert!(canvas.tool().is_idle());
    assert!(canvas.drain_events().iter().all(|e| !matches!(e, CanvasEvent::TextCommitted { .. })));
}

#[test]
fn text_editing_commits_the_edited_string() {
    let mut edited = canvas();
    edited.set_config("font", "No Such Family For Tests").unwrap();
    edited.set_config("fontsize", "24").unwrap();
    edited.set_mode(Mode::Text);
    edited.pointer_down(PointerEvent::primary(20.0, 60.0));
    type_text(&mut edited, "A");
    type_text(&mut edited, "B");
    edited.key(KeyInput::Backspace);
    type_text(&mut edited, "C");
    edited.tick();
    edited.pointer_down(PointerEvent::primary(300.0, 300.0));

    let events = edited.drain_events();
    assert!(events.contains(&CanvasEvent::TextCommitted { text: "AC".into() }));

    let mut direct = canvas();
    direct.set_config("font", "No Such Family For Tests").unwrap();
    direct.set_config("fontsize", "24").unwrap();
    direct.set_mode(Mode::Text);
    direct.pointer_down(PointerEvent::primary(20.0, 60.0));
    type_text(&mut direct, "AC");
    direct.pointer_down(PointerEvent::primary(300.0, 300.0));

    assert!(!non_white(&edited).is_empty());
    assert_eq!(edited.surface().pixmap().data(), direct.surface().pixmap().data());
}

#[test]
fn dropper_reports_picked_colors() {
    let mut canvas = canvas();
    canvas.set_primary_color("#804020").unwrap();
    canvas.set_mode(Mode::Fill);
    canvas.pointer_down(PointerEvent::primary(5.0, 5.0));

    canvas.set_mode(Mode::Dropper);
    canvas.drain_events();
    canvas.handle(CanvasInput::PointerDown(PointerEvent::secondary(300.0, 200.0)));
    assert_eq!(
        canvas.drain_events(),
        vec![CanvasEvent::SecondaryColorChanged("#804020".into())]
    );
    assert_eq!(canvas.colors().secondary, Some(Color32::from_rgb(0x80, 0x40, 0x20)));
}

#[test]
fn flood_fill_stops_at_shape_outlines() {
    let mut canvas = canvas();
    canvas.set_config("fill", "false").unwrap();
    canvas.set_config("size", "2").unwrap();
    canvas.set_mode(Mode::Rect);
    canvas.pointer_down(PointerEvent::primary(100.0, 100.0));
    canvas.pointer_up(PointerEvent::primary(200.0, 200.0));

    canvas.set_primary_color("#ff0000").unwrap();
    canvas.set_mode(Mode::Fill);
    canvas.pointer_down(PointerEvent::primary(150.0, 150.0));

    let surface = canvas.surface();
    assert_eq!(surface.pixel(150, 150), Some(Color32::from_rgb(255, 0, 0)));
    assert_eq!(surface.pixel(50, 50), Some(Color32::WHITE));
    assert_eq!(surface.pixel(100, 150), Some(Color32::BLACK));
}

#[test]
fn seeded_spray_is_reproducible() {
    let spray = |seed| {
        let mut canvas = Canvas::new().unwrap();
        canvas.seed_rng(seed);
        canvas.set_mode(Mode::Spray);
        canvas.pointer_down(PointerEvent::primary(300.0, 200.0));
        canvas.pointer_move(Pos2::new(305.0, 200.0));
        canvas.pointer_move(Pos2::new(310.0, 205.0));
        canvas.pointer_up(PointerEvent::primary(310.0, 205.0));
        canvas.surface().pixmap().data().to_vec()
    };
    assert_eq!(spray(3), spray(3));
    assert_ne!(spray(3), spray(4));
}

#[test]
fn pointer_positions_outside_the_canvas_are_tolerated() {
    let mut canvas = canvas();
    for mode in Mode::ALL {
        canvas.set_mode(mode);
        canvas.pointer_down(PointerEvent::primary(-50.0, -50.0));
        canvas.pointer_move(Pos2::new(900.0, 700.0));
        canvas.tick();
        canvas.pointer_up(PointerEvent::primary(900.0, 700.0));
        canvas.double_click(PointerEvent::primary(900.0, 700.0));
    }
    assert!(canvas.composite().width() > 0);
}
