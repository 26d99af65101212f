use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// The swatches offered by the host palette, two rows of fourteen
pub const PALETTE: [&str; 28] = [
    "#000000", "#82817f", "#820300", "#868417", "#007e03", "#037e7b", "#040079",
    "#81067a", "#7f7e45", "#05403c", "#0a7cf6", "#093c7e", "#7e07f9", "#7c4002",
    "#ffffff", "#c1c1c1", "#f70406", "#fffd00", "#08fb01", "#0bf8ee", "#0000fa",
    "#b92fc2", "#fffc91", "#00fd83", "#87f9f9", "#8481c4", "#dc137d", "#fb803c",
];

/// Alpha applied to the eraser color
pub const ERASER_ALPHA: u8 = 100;

/// Parse a `#rrggbb` (or `#rrggbbaa`) string into a color
pub fn parse_hex(hex: &str) -> CanvasResult<Color32> {
    let trimmed = hex.trim();
    let prefixed = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    Color32::from_hex(&prefixed).map_err(|_| CanvasError::InvalidColor(hex.to_string()))
}

/// Format a color as `#rrggbb`, dropping alpha
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Primary and secondary colors, shared by every tool
///
/// Both survive mode switches. The secondary color is optional: until the
/// host picks one, anything derived from it falls back to white.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorState {
    pub primary: Color32,
    pub secondary: Option<Color32>,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            primary: Color32::BLACK,
            secondary: None,
        }
    }
}

impl ColorState {
    /// Color used to clear the canvas
    pub fn background(&self) -> Color32 {
        self.secondary.unwrap_or(Color32::WHITE)
    }

    /// Translucent background color painted by the eraser
    pub fn eraser(&self) -> tiny_skia::Color {
        let [r, g, b, _] = self.background().to_srgba_unmultiplied();
        tiny_skia::Color::from_rgba8(r, g, b, ERASER_ALPHA)
    }

    /// Color picked by a mouse button: left paints with the primary color,
    /// anything else with the secondary (or the background when unset)
    pub fn for_button(&self, button: egui::PointerButton) -> Color32 {
        match button {
            egui::PointerButton::Primary => self.primary,
            _ => self.background(),
        }
    }
}
