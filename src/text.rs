//! Font lookup and single-line text rasterization for the text tool.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::Pixmap;

use crate::config::FontConfig;

/// Horizontal shear applied when an italic face has to be faked
const SYNTHETIC_SHEAR: f32 = 0.2;

/// Text rendered into its own pixmap
///
/// `left`/`top` locate the pixmap relative to the baseline origin the text
/// was laid out from.
#[derive(Debug, Clone)]
pub struct TextRaster {
    pub pixmap: Pixmap,
    pub left: i32,
    pub top: i32,
}

#[derive(Clone)]
struct Face {
    font: FontArc,
    synthetic_bold: bool,
    synthetic_italic: bool,
}

/// Resolves font configurations to faces, caching what it finds
///
/// System fonts are looked up by family name on first use; families that
/// cannot be found fall back to the proportional font bundled with egui.
#[derive(Default)]
pub struct FontBook {
    system: Option<fontdb::Database>,
    faces: HashMap<(String, bool, bool), Option<Face>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("system_loaded", &self.system.is_some())
            .field("cached_faces", &self.faces.len())
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn system(&mut self) -> &fontdb::Database {
        self.system.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
            db
        })
    }

    fn face(&mut self, config: &FontConfig) -> Option<Face> {
        let key = (config.family.to_lowercase(), config.bold, config.italic);
        if let Some(face) = self.faces.get(&key) {
            return face.clone();
        }

        let face = self.system_face(config).or_else(|| {
            log::warn!("Font family {:?} not found, using bundled font", config.family);
            bundled_font().map(|font| Face {
                font,
                synthetic_bold: config.bold,
                synthetic_italic: config.italic,
            })
        });
        self.faces.insert(key, face.clone());
        face
    }

    fn system_face(&mut self, config: &FontConfig) -> Option<Face> {
        let families = [fontdb::Family::Name(&config.family)];
        let query = fontdb::Query {
            families: &families,
            weight: if config.bold { fontdb::Weight::BOLD } else { fontdb::Weight::NORMAL },
            stretch: fontdb::Stretch::Normal,
            style: if config.italic { fontdb::Style::Italic } else { fontdb::Style::Normal },
        };
        let db = self.system();
        let id = db.query(&query)?;
        let info = db.face(id)?;
        let synthetic_bold = config.bold && info.weight.0 < fontdb::Weight::SEMIBOLD.0;
        let synthetic_italic = config.italic && info.style == fontdb::Style::Normal;

        let font = db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            })
            .flatten()?;
        Some(Face {
            font: FontArc::new(font),
            synthetic_bold,
            synthetic_italic,
        })
    }

    /// Render `text` in `color`, laid out from a baseline origin at (0, 0)
    ///
    /// Returns `None` for empty text or when no font at all is available.
    pub fn rasterize(
        &mut self,
        text: &str,
        config: &FontConfig,
        color: tiny_skia::Color,
    ) -> Option<TextRaster> {
        if text.is_empty() {
            return None;
        }
        let face = self.face(config)?;
        let font = &face.font;
        let pt = config.size.max(1) as f32;
        let scale = font
            .pt_to_px_scale(pt)
            .unwrap_or_else(|| PxScale::from(pt * 96.0 / 72.0));
        let scaled = font.as_scaled(scale);

        // Per-pixel coverage keyed by baseline-relative coordinates
        let mut coverage: HashMap<(i32, i32), f32> = HashMap::new();
        let mut plot = |x: i32, y: i32, c: f32| {
            let slot = coverage.entry((x, y)).or_insert(0.0);
            *slot = slot.max(c);
        };

        let mut cursor = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(cursor, 0.0));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, c| {
                    let y = bounds.min.y as i32 + py as i32;
                    let mut x = bounds.min.x + px as f32;
                    if face.synthetic_italic {
                        x -= y as f32 * SYNTHETIC_SHEAR;
                    }
                    let x = x.round() as i32;
                    plot(x, y, c);
                    if face.synthetic_bold {
                        plot(x + 1, y, c);
                    }
                });
            }
            cursor += scaled.h_advance(id);
            previous = Some(id);
        }

        if config.underline && cursor > 0.0 {
            let offset = (pt * 0.1).max(1.0).round() as i32;
            let thickness = (pt * 0.06).max(1.0).round() as i32;
            for y in offset..offset + thickness {
                for x in 0..cursor.ceil() as i32 {
                    plot(x, y, 1.0);
                }
            }
        }

        let left = coverage.keys().map(|(x, _)| *x).min()?;
        let right = coverage.keys().map(|(x, _)| *x).max()?;
        let top = coverage.keys().map(|(_, y)| *y).min()?;
        let bottom = coverage.keys().map(|(_, y)| *y).max()?;
        let width = (right - left + 1) as u32;
        let height = (bottom - top + 1) as u32;

        let mut pixmap = Pixmap::new(width, height)?;
        let stride = width as usize;
        let pixels = pixmap.pixels_mut();
        for ((x, y), c) in coverage {
            let mut ink = color;
            ink.apply_opacity(c.clamp(0.0, 1.0));
            pixels[(y - top) as usize * stride + (x - left) as usize] =
                ink.premultiply().to_color_u8();
        }

        Some(TextRaster { pixmap, left, top })
    }
}

/// First proportional font shipped with egui
fn bundled_font() -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let name = definitions
        .families
        .get(&egui::FontFamily::Proportional)?
        .first()?;
    let data = definitions.font_data.get(name)?;
    FontVec::try_from_vec_and_index(data.font.to_vec(), data.index)
        .ok()
        .map(FontArc::new)
}
