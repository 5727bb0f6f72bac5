//! Multi-line text layout and field drawing.

use image::RgbaImage;

use super::canvas::{self, PixelRect};
use super::effects::{self, MAX_PADDING, blur_padding, shadow_sigma};
use super::fonts::{Face, FontBook};
use crate::model::{Align, Field};

/// Lines wrap while their measured width stays strictly under this share of
/// the canvas width.
pub const WRAP_RATIO: f32 = 0.85;

/// Distance between successive line centers, as a multiple of the pixel size.
pub const LINE_SPACING: f32 = 1.3;

/// Greedy word wrap.
///
/// Words are packed onto a line while the candidate line measures strictly
/// less than `max_width`. A word that is too wide on its own still gets a
/// line of its own, and the result always holds at least one line.
pub fn wrap_words<F>(text: &str, max_width: f32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Position of one wrapped line on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    pub text: String,
    pub left: f32,
    /// Vertical center of the line.
    pub middle: f32,
    pub width: f32,
    pub height: f32,
}

impl LineBox {
    /// Rectangle behind the line, used for the background overlay.
    pub fn backdrop(&self) -> PixelRect {
        PixelRect::new(self.left, self.middle - self.height / 2.0, self.width, self.height)
    }
}

/// Wrap and place a field's value. The first line is centered on `y`;
/// later lines step down by [`LINE_SPACING`].
pub fn layout_field(
    field: &Field,
    canvas_width: u32,
    canvas_height: u32,
    scale: f32,
    measure: impl Fn(&str) -> f32,
) -> Vec<LineBox> {
    let width = canvas_width as f32;
    let px = field.font_size as f32 * scale;
    let line_height = px * LINE_SPACING;
    let anchor = field.anchor_x_from_left() as f32 / 100.0 * width;
    let first = field.y as f32 / 100.0 * canvas_height as f32;

    wrap_words(&field.value, width * WRAP_RATIO, &measure)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let measured = measure(&text);
            let left = match field.align {
                Align::Left => anchor,
                Align::Center => anchor - measured / 2.0,
                Align::Right => anchor - measured,
            };
            LineBox {
                text,
                left,
                middle: first + i as f32 * line_height,
                width: measured,
                height: line_height,
            }
        })
        .collect()
}

/// Draw one field onto the canvas.
///
/// Per line, in order: background overlay, shadow, stroke, glyph fill. The
/// shadow is cast by the stroked outline when there is one. Out-of-range
/// attributes are clamped before anything is sized from them.
pub fn draw_field(canvas: &mut RgbaImage, field: &Field, fonts: &FontBook, scale: f32) {
    if !field.visible {
        return;
    }
    let mut field = field.clone();
    field.clamp_all();
    let field = &field;

    let face = fonts.face(field.bold, field.italic);
    let px = field.font_size as f32 * scale;
    let lines = layout_field(field, canvas.width(), canvas.height(), scale, |s| {
        face.measure(s, px)
    });

    let sigma = if field.shadow.is_active() {
        shadow_sigma(&field.shadow, scale)
    } else {
        0.0
    };
    let stroke_radius = if field.stroke.is_active() {
        field.stroke.width as f32 * scale / 2.0
    } else {
        0.0
    };
    let pad = (blur_padding(sigma) + stroke_radius.ceil() as usize + 1).min(MAX_PADDING);

    for line in &lines {
        if field.background.is_active() {
            canvas::fill_rect(canvas, line.backdrop(), field.background.effective_color());
        }
        if line.text.is_empty() {
            continue;
        }
        draw_line(canvas, &face, line, px, pad, field, sigma, stroke_radius);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_line(
    canvas: &mut RgbaImage,
    face: &Face,
    line: &LineBox,
    px: f32,
    pad: usize,
    field: &Field,
    sigma: f32,
    stroke_radius: f32,
) {
    let glyphs = face.rasterize(&line.text, px, pad);
    let glyph_height = face.metrics(px).height;
    let left = line.left.round() as i64 - pad as i64;
    let top = (line.middle - glyph_height / 2.0).round() as i64 - pad as i64;

    let outline = (stroke_radius > 0.0).then(|| effects::dilate(&glyphs, stroke_radius));

    if sigma > 0.0 {
        let caster = outline.as_ref().unwrap_or(&glyphs);
        effects::draw_shadow(canvas, caster, left, top, sigma, field.shadow.color);
    }
    if let Some(outline) = &outline {
        canvas::draw_mask(canvas, outline, left, top, field.stroke.color);
    }
    canvas::draw_mask(canvas, &glyphs, left, top, field.color);
}
