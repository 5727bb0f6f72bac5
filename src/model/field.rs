//! Positioned text fields.

use serde::{Deserialize, Serialize};

use super::{Color, Overlay, Shadow, Stroke, clamp_percent, clamp_range};

pub const MIN_FONT_SIZE: f64 = 6.0;
pub const MAX_FONT_SIZE: f64 = 60.0;

/// Horizontal text alignment.
///
/// Alignment also decides which card edge `x` is measured from: the left
/// edge for `Left`/`Center`, the right edge for `Right`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// One positioned text element on a side.
///
/// Fields are public for reading and serde. Writes that must stay in range
/// go through the builders, [`Field::set_position`] or a
/// [`FieldUpdate`](super::FieldUpdate); after assigning fields directly,
/// call [`Field::clamp_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    /// Editor display name, never rendered.
    pub label: String,
    pub value: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: Color,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub align: Align,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub stroke: Stroke,
    #[serde(default)]
    pub shadow: Shadow,
    #[serde(default)]
    pub background: Overlay,
}

fn default_visible() -> bool {
    true
}

impl Field {
    pub fn new(id: &str, label: &str, value: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
            x: 50.0,
            y: 50.0,
            font_size: 12.0,
            color: Color::BLACK,
            bold: false,
            italic: false,
            align: Align::Center,
            visible: true,
            stroke: Stroke::default(),
            shadow: Shadow::default(),
            background: Overlay::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn size(mut self, font_size: f64) -> Self {
        self.font_size = clamp_font_size(font_size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = clamp_percent(x);
        self.y = clamp_percent(y);
    }

    /// Anchor `x` measured from the left card edge, in percent.
    pub fn anchor_x_from_left(&self) -> f64 {
        match self.align {
            Align::Right => 100.0 - self.x,
            Align::Left | Align::Center => self.x,
        }
    }

    /// Re-applies every range rule. Used after deserializing foreign data.
    /// Bring every numeric attribute back into its range.
    pub fn clamp_all(&mut self) {
        self.set_position(self.x, self.y);
        self.font_size = clamp_font_size(self.font_size);
        self.stroke = self.stroke.clamped();
        self.shadow = self.shadow.clamped();
        self.background = self.background.clamped();
    }
}

pub fn clamp_font_size(size: f64) -> f64 {
    clamp_range(size, MIN_FONT_SIZE, MAX_FONT_SIZE)
}
