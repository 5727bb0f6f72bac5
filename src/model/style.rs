//! Visual effect groups shared by fields and layers.

use serde::{Deserialize, Serialize};

use super::{Color, clamp_range};

/// Upper bound for stroke width and shadow blur, in design units.
pub const MAX_EFFECT_SIZE: f64 = 50.0;

/// Non-finite sizes disable the effect rather than saturating it.
fn clamp_effect_size(size: f64) -> f64 {
    if size.is_finite() {
        clamp_range(size, 0.0, MAX_EFFECT_SIZE)
    } else {
        0.0
    }
}

/// Outline drawn around text glyphs or a layer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Outline width in design units, 0–50. Zero disables the stroke.
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    /// Width limited to `0..=MAX_EFFECT_SIZE`; NaN and infinities become 0.
    pub fn clamped(self) -> Self {
        Self {
            width: clamp_effect_size(self.width),
            ..self
        }
    }

    pub fn is_active(&self) -> bool {
        self.width > 0.0 && self.color.a > 0
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: Color::BLACK,
        }
    }
}

/// Drop shadow with zero offset. Zero blur disables it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub blur: f64,
    pub color: Color,
}

impl Shadow {
    pub fn clamped(self) -> Self {
        Self {
            blur: clamp_effect_size(self.blur),
            ..self
        }
    }

    pub fn is_active(&self) -> bool {
        self.blur > 0.0 && self.color.a > 0
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            blur: 0.0,
            color: Color::rgba(0, 0, 0, 128),
        }
    }
}

/// Flat color wash. For fields it backs each text line, for layers it
/// covers the whole rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub color: Color,
    /// Percent, 0–100.
    pub opacity: f64,
}

impl Overlay {
    pub fn clamped(self) -> Self {
        Self {
            opacity: clamp_range(self.opacity, 0.0, 100.0),
            ..self
        }
    }

    pub fn is_active(&self) -> bool {
        self.opacity > 0.0
    }

    /// The overlay color with the opacity folded into its alpha.
    pub fn effective_color(&self) -> Color {
        self.color.with_opacity((self.opacity / 100.0) as f32)
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 0.0,
        }
    }
}
