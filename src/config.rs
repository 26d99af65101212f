use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Point sizes offered by the font size picker
pub const FONT_SIZES: [u32; 17] = [
    7, 8, 9, 10, 11, 12, 13, 14, 18, 24, 36, 48, 64, 72, 96, 144, 288,
];

/// Range of the stroke size slider
pub const MIN_SIZE: u32 = 1;
pub const MAX_SIZE: u32 = 20;

/// Font attributes read by the text tool at draw time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Times".to_string(),
            size: 12,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// Settings shared by all shape and text tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Base stroke width; tools apply their own multipliers
    pub size: u32,
    /// Fill closed shapes with the secondary color
    pub fill: bool,
    pub font: FontConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            size: MIN_SIZE,
            fill: true,
            font: FontConfig::default(),
        }
    }
}

/// A single toolbar change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSetting {
    Size(u32),
    Fill(bool),
    FontFamily(String),
    FontSize(u32),
    Bold(bool),
    Italic(bool),
    Underline(bool),
}

impl ConfigSetting {
    /// Build a setting from a named key and its textual value
    pub fn parse(key: &str, value: &str) -> CanvasResult<Self> {
        let invalid = || CanvasError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let flag = || value.trim().parse::<bool>().map_err(|_| invalid());
        let number = || value.trim().parse::<u32>().map_err(|_| invalid());

        Ok(match key {
            "size" => Self::Size(number()?),
            "fill" => Self::Fill(flag()?),
            "font" => {
                if value.trim().is_empty() {
                    return Err(invalid());
                }
                Self::FontFamily(value.trim().to_string())
            }
            "fontsize" => Self::FontSize(number()?),
            "bold" => Self::Bold(flag()?),
            "italic" => Self::Italic(flag()?),
            "underline" => Self::Underline(flag()?),
            other => return Err(CanvasError::UnknownConfigKey(other.to_string())),
        })
    }
}

impl ToolConfig {
    pub fn apply(&mut self, setting: ConfigSetting) {
        match setting {
            ConfigSetting::Size(size) => self.size = size.clamp(MIN_SIZE, MAX_SIZE),
            ConfigSetting::Fill(fill) => self.fill = fill,
            ConfigSetting::FontFamily(family) => self.font.family = family,
            ConfigSetting::FontSize(size) => self.font.size = size.max(1),
            ConfigSetting::Bold(bold) => self.font.bold = bold,
            ConfigSetting::Italic(italic) => self.font.italic = italic,
            ConfigSetting::Underline(underline) => self.font.underline = underline,
        }
    }
}
