//! Font lookup and glyph rasterization.
//!
//! Outline faces come from the system font database and are rasterized with
//! ab_glyph into anti-aliased coverage masks. When no usable system face
//! exists, the built-in Spleen 12×24 bitmap font is scaled instead, with
//! synthetic bold and italic.
//!
//! A face is used for both measuring and drawing, so wrapped line widths
//! always match what ends up on the card.

use ab_glyph::{Font, FontArc, FontVec, ScaleFont};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

use super::canvas::Mask;

/// Sans-serif families tried in order before the generic fallback.
const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

const SPLEEN_W: usize = 12;
const SPLEEN_H: usize = 24;

/// Horizontal shear applied for synthetic italics (x shift per unit height).
const ITALIC_SHEAR: f32 = 0.2;

/// A resolved typeface at a given weight/style.
#[derive(Clone)]
pub enum Face {
    Outline {
        font: FontArc,
        /// The system had no bold face; glyphs are drawn twice, offset.
        fake_bold: bool,
        /// The system had no italic face; glyphs are sheared.
        fake_italic: bool,
    },
    Bitmap {
        bold: bool,
        italic: bool,
    },
}

/// Vertical metrics of one line of text at a pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub height: f32,
}

impl Face {
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Face::Bitmap { .. })
    }

    fn bold_offset(px: f32) -> f32 {
        (px / 24.0).max(1.0)
    }

    fn is_italic(&self) -> bool {
        match self {
            Face::Outline { fake_italic, .. } => *fake_italic,
            Face::Bitmap { italic, .. } => *italic,
        }
    }

    fn is_bold(&self) -> bool {
        match self {
            Face::Outline { fake_bold, .. } => *fake_bold,
            Face::Bitmap { bold, .. } => *bold,
        }
    }

    pub fn metrics(&self, px: f32) -> LineMetrics {
        match self {
            Face::Outline { font, .. } => {
                let scaled = font.as_scaled(px);
                LineMetrics {
                    ascent: scaled.ascent(),
                    height: scaled.ascent() - scaled.descent(),
                }
            }
            Face::Bitmap { .. } => LineMetrics {
                ascent: px * 0.8,
                height: px,
            },
        }
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            Face::Outline { font, .. } => {
                let scaled = font.as_scaled(px);
                let mut width = 0.0;
                let mut prev = None;
                for ch in text.chars() {
                    let id = font.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            Face::Bitmap { .. } => text.chars().count() as f32 * px * 0.5,
        }
    }

    /// Rasterize one line of text into a coverage mask with `pad` empty
    /// pixels on every side. The glyph box's top-left is at (pad, pad).
    pub fn rasterize(&self, text: &str, px: f32, pad: usize) -> Mask {
        let metrics = self.metrics(px);
        let extra = if self.is_italic() {
            (metrics.height * ITALIC_SHEAR).ceil() as usize
        } else {
            0
        } + if self.is_bold() {
            Self::bold_offset(px).ceil() as usize
        } else {
            0
        };
        let width = self.measure(text, px).ceil().max(0.0) as usize + extra + 2 * pad;
        let height = metrics.height.ceil().max(1.0) as usize + 2 * pad;
        let mut mask = Mask::new(width, height);

        match self {
            Face::Outline { font, .. } => {
                self.rasterize_outline(font, text, px, pad as f32, metrics, &mut mask)
            }
            Face::Bitmap { .. } => self.rasterize_bitmap(text, px, pad as f32, &mut mask),
        }
        mask
    }

    fn rasterize_outline(
        &self,
        font: &FontArc,
        text: &str,
        px: f32,
        pad: f32,
        metrics: LineMetrics,
        mask: &mut Mask,
    ) {
        let scaled = font.as_scaled(px);
        let baseline = pad + metrics.ascent;
        let shear = if self.is_italic() { ITALIC_SHEAR } else { 0.0 };
        let passes: &[f32] = if self.is_bold() {
            &[0.0, Self::bold_offset(px)]
        } else {
            &[0.0]
        };

        let mut caret = pad;
        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            for &dx in passes {
                let glyph = id.with_scale_and_position(px, ab_glyph::point(caret + dx, baseline));
                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        let y = gy as f32 + bounds.min.y;
                        let skew = (baseline - y) * shear;
                        let x = gx as f32 + bounds.min.x + skew;
                        mask.accumulate(x as i32, y as i32, coverage);
                    });
                }
            }
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
    }

    fn rasterize_bitmap(&self, text: &str, px: f32, pad: f32, mask: &mut Mask) {
        let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
            return;
        };
        let mut lookup = |ch: char| -> Option<Vec<bool>> {
            let mut utf8 = [0u8; 4];
            let glyph = spleen.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes())?;
            let mut bits = vec![false; SPLEEN_W * SPLEEN_H];
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < SPLEEN_H && col_x < SPLEEN_W {
                        bits[row_y * SPLEEN_W + col_x] = on;
                    }
                }
            }
            Some(bits)
        };

        let cell_w = px * 0.5;
        let cell_h = px;
        let shear = if self.is_italic() { ITALIC_SHEAR } else { 0.0 };
        let smear = if self.is_bold() {
            Self::bold_offset(px).ceil() as i32
        } else {
            0
        };
        let (dw, dh) = (cell_w.ceil() as usize, cell_h.ceil() as usize);

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = pad + i as f32 * cell_w;
            let bits = lookup(ch).unwrap_or_else(|| box_glyph());
            for dy in 0..dh {
                let sy = (dy as f32 * SPLEEN_H as f32 / cell_h) as usize;
                if sy >= SPLEEN_H {
                    continue;
                }
                let skew = (cell_h - dy as f32) * shear;
                for dx in 0..dw {
                    let sx = (dx as f32 * SPLEEN_W as f32 / cell_w) as usize;
                    if sx >= SPLEEN_W || !bits[sy * SPLEEN_W + sx] {
                        continue;
                    }
                    let x = (left + dx as f32 + skew) as i32;
                    let y = (pad + dy as f32) as i32;
                    for s in 0..=smear {
                        mask.accumulate(x + s, y, 1.0);
                    }
                }
            }
        }
    }
}

/// Hollow rectangle used for characters the bitmap font lacks.
fn box_glyph() -> Vec<bool> {
    let mut bits = vec![false; SPLEEN_W * SPLEEN_H];
    for y in 4..SPLEEN_H - 2 {
        for x in 1..SPLEEN_W - 1 {
            let edge = y == 4 || y == SPLEEN_H - 3 || x == 1 || x == SPLEEN_W - 2;
            bits[y * SPLEEN_W + x] = edge;
        }
    }
    bits
}

/// Resolves and caches faces by weight/style.
pub struct FontBook {
    db: Option<Database>,
    cache: Mutex<HashMap<(bool, bool), Face>>,
}

impl FontBook {
    /// Load the system font database once.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        info!(faces = db.len(), "system font database loaded");
        Self {
            db: Some(db),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Only the built-in bitmap font. Output does not depend on the host.
    pub fn builtin() -> Self {
        Self {
            db: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn face(&self, bold: bool, italic: bool) -> Face {
        let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        cache
            .entry((bold, italic))
            .or_insert_with(|| {
                self.db
                    .as_ref()
                    .and_then(|db| load_outline(db, bold, italic))
                    .unwrap_or(Face::Bitmap { bold, italic })
            })
            .clone()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::system()
    }
}

fn load_outline(db: &Database, bold: bool, italic: bool) -> Option<Face> {
    let mut families: Vec<Family<'_>> = PREFERRED_FAMILIES.iter().map(|&n| Family::Name(n)).collect();
    families.push(Family::SansSerif);

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db.query(&query)?;
    let info = db.face(id)?;
    let fake_bold = bold && info.weight.0 < Weight::SEMIBOLD.0;
    let fake_italic = italic && info.style == Style::Normal;

    let font = db
        .with_face_data(id, |data, index| {
            FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
        })
        .flatten()?;

    debug!(
        family = info.families.first().map(|(n, _)| n.as_str()).unwrap_or("?"),
        bold,
        italic,
        fake_bold,
        fake_italic,
        "resolved outline face"
    );

    Some(Face::Outline {
        font: FontArc::new(font),
        fake_bold,
        fake_italic,
    })
}
