use egui::{Context, Event, Key, PointerButton, Pos2, Rect};

use crate::canvas::CanvasInput;
use crate::tools::{KeyInput, PointerEvent};

const BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// Converts raw egui input into canvas input events
///
/// Presses only count when they start over the canvas image; moves and
/// releases are forwarded wherever they happen so drags that leave the
/// canvas still finish. Positions are translated into canvas pixels.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    canvas_size: egui::Vec2,
    pressed_inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen rectangle the canvas image was painted into, and its pixel size
    pub fn set_canvas_rect(&mut self, rect: Rect, width: u32, height: u32) {
        self.canvas_rect = Some(rect);
        self.canvas_size = egui::vec2(width as f32, height as f32);
    }

    /// Map a screen position into canvas pixel coordinates
    pub fn to_canvas(&self, screen: Pos2) -> Option<Pos2> {
        let rect = self.canvas_rect?;
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let rel = screen - rect.min;
        Some(Pos2::new(
            rel.x * self.canvas_size.x / rect.width(),
            rel.y * self.canvas_size.y / rect.height(),
        ))
    }

    fn over_canvas(&self, screen: Pos2) -> bool {
        self.canvas_rect.is_some_and(|rect| rect.contains(screen))
    }

    /// Process this frame's egui input; keys are only collected when
    /// `capture_keys` is set and no widget has keyboard focus
    pub fn process_input(&mut self, ctx: &Context, capture_keys: bool) -> Vec<CanvasInput> {
        let mut events = Vec::new();
        let keys_free = capture_keys && !ctx.wants_keyboard_input();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos().or(input.pointer.interact_pos());

            if let Some(screen) = hover {
                if Some(screen) != self.last_pointer_pos {
                    if let Some(pos) = self.to_canvas(screen) {
                        events.push(CanvasInput::PointerMove(pos));
                    }
                }
                self.last_pointer_pos = Some(screen);
            }

            for button in BUTTONS {
                let Some(screen) = hover else {
                    break;
                };
                let Some(pos) = self.to_canvas(screen) else {
                    break;
                };
                let event = PointerEvent::new(pos, button);

                if input.pointer.button_pressed(button) && self.over_canvas(screen) {
                    self.pressed_inside = true;
                    events.push(CanvasInput::PointerDown(event));
                }
                if input.pointer.button_released(button) && self.pressed_inside {
                    self.pressed_inside = input.pointer.any_down();
                    // Every release ends the gesture, even the second one of a double-click
                    events.push(CanvasInput::PointerUp(event));
                    if input.pointer.button_double_clicked(button) {
                        events.push(CanvasInput::DoubleClick(event));
                    }
                }
            }

            if keys_free {
                for event in &input.events {
                    match event {
                        Event::Text(text) => {
                            events.push(CanvasInput::Key(KeyInput::Text(text.clone())))
                        }
                        Event::Key {
                            key: Key::Backspace,
                            pressed: true,
                            ..
                        } => events.push(CanvasInput::Key(KeyInput::Backspace)),
                        _ => {}
                    }
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::tools::Mode;
    use egui::{Modifiers, RawInput};

    /// Run one egui frame per entry and collect what the handler emits
    fn run_frames(input: &mut InputHandler, frames: Vec<Event>) -> Vec<CanvasInput> {
        let ctx = Context::default();
        let mut emitted = Vec::new();
        for (i, event) in frames.into_iter().enumerate() {
            let raw = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0))),
                time: Some(i as f64 * 0.05),
                events: vec![event],
                ..Default::default()
            };
            let _ = ctx.run(raw, |ctx| emitted.extend(input.process_input(ctx, false)));
        }
        emitted
    }

    fn button(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: Pos2::new(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn screen_positions_scale_into_canvas_pixels() {
        let mut input = InputHandler::new();
        assert_eq!(input.to_canvas(Pos2::new(5.0, 5.0)), None);

        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(300.0, 200.0));
        input.set_canvas_rect(rect, 600, 400);
        assert_eq!(input.to_canvas(Pos2::new(100.0, 50.0)), Some(Pos2::new(0.0, 0.0)));
        assert_eq!(input.to_canvas(Pos2::new(250.0, 150.0)), Some(Pos2::new(300.0, 200.0)));
        // Outside the image still maps, for drags that leave the canvas
        assert_eq!(input.to_canvas(Pos2::new(90.0, 50.0)), Some(Pos2::new(-20.0, 0.0)));
    }

    #[test]
    fn presses_only_count_over_the_canvas() {
        let mut input = InputHandler::new();
        input.set_canvas_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(60.0, 40.0)), 60, 40);
        assert!(input.over_canvas(Pos2::new(10.0, 10.0)));
        assert!(!input.over_canvas(Pos2::new(70.0, 10.0)));
    }

    #[test]
    fn double_click_still_releases_the_button() {
        let mut input = InputHandler::new();
        input.set_canvas_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(600.0, 400.0)), 600, 400);
        let emitted = run_frames(
            &mut input,
            vec![
                Event::PointerMoved(Pos2::new(100.0, 100.0)),
                button(100.0, 100.0, true),
                button(100.0, 100.0, false),
                button(100.0, 100.0, true),
                button(100.0, 100.0, false),
                Event::PointerMoved(Pos2::new(300.0, 100.0)),
            ],
        );

        let ups = emitted
            .iter()
            .filter(|e| matches!(e, CanvasInput::PointerUp(_)))
            .count();
        assert_eq!(ups, 2);
        let double = emitted
            .iter()
            .position(|e| matches!(e, CanvasInput::DoubleClick(_)))
            .expect("double-click reported");
        assert!(matches!(emitted[double - 1], CanvasInput::PointerUp(_)));

        let mut canvas = Canvas::new().unwrap();
        canvas.set_mode(Mode::Pen);
        for event in emitted {
            canvas.handle(event);
        }
        assert_eq!(canvas.surface().pixel(200, 100), Some(egui::Color32::WHITE));
    }
}
