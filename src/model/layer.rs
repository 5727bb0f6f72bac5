//! Photo and signature image regions.

use serde::{Deserialize, Serialize};

use super::{Color, Overlay, Shadow, Stroke, clamp_percent, clamp_range};

/// Brightness/contrast are percent multipliers; 100 leaves the image alone.
pub const NEUTRAL_ADJUST: f64 = 100.0;
pub const MAX_ADJUST: f64 = 200.0;

/// Which image layer of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Photo,
    #[serde(rename = "sig")]
    Signature,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Photo => "photo",
            LayerKind::Signature => "sig",
        }
    }
}

/// One image region. `x`/`y` is the rectangle center, `w`/`h` its size,
/// all in percent of the card dimensions.
///
/// As with [`Field`](super::Field), only the setters, a
/// [`LayerUpdate`](super::LayerUpdate) and [`Layer::clamp_all`] keep the
/// attributes in range; direct assignments are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub stroke: Stroke,
    #[serde(default)]
    pub shadow: Shadow,
    #[serde(default)]
    pub overlay: Overlay,
    #[serde(default = "default_adjust")]
    pub brightness: f64,
    #[serde(default = "default_adjust")]
    pub contrast: f64,
    #[serde(default)]
    pub colorize: bool,
    #[serde(default)]
    pub colorize_color: Color,
}

fn default_visible() -> bool {
    true
}

fn default_adjust() -> f64 {
    NEUTRAL_ADJUST
}

impl Layer {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let mut layer = Self {
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            visible: true,
            stroke: Stroke::default(),
            shadow: Shadow::default(),
            overlay: Overlay::default(),
            brightness: NEUTRAL_ADJUST,
            contrast: NEUTRAL_ADJUST,
            colorize: false,
            colorize_color: Color::BLACK,
        };
        layer.set_position(x, y);
        layer.set_size(w, h);
        layer
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = clamp_percent(x);
        self.y = clamp_percent(y);
    }

    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = clamp_percent(w);
        self.h = clamp_percent(h);
    }

    pub fn set_adjust(&mut self, brightness: f64, contrast: f64) {
        self.brightness = clamp_adjust(brightness);
        self.contrast = clamp_adjust(contrast);
    }

    /// True when brightness or contrast differ from neutral.
    pub fn has_adjust(&self) -> bool {
        self.brightness != NEUTRAL_ADJUST || self.contrast != NEUTRAL_ADJUST
    }

    /// Bring every numeric attribute back into its range.
    pub fn clamp_all(&mut self) {
        self.set_position(self.x, self.y);
        self.set_size(self.w, self.h);
        self.set_adjust(self.brightness, self.contrast);
        self.stroke = self.stroke.clamped();
        self.shadow = self.shadow.clamped();
        self.overlay = self.overlay.clamped();
    }
}

fn clamp_adjust(value: f64) -> f64 {
    clamp_range(value, 0.0, MAX_ADJUST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_is_neutral() {
        let layer = Layer::new(50.0, 30.0, 40.0, 25.0);
        assert!(layer.visible);
        assert!(!layer.has_adjust());
        assert!(!layer.colorize);
    }

    #[test]
    fn test_geometry_and_adjust_clamp() {
        let mut layer = Layer::new(120.0, -4.0, 300.0, f64::NAN);
        assert_eq!((layer.x, layer.y, layer.w, layer.h), (100.0, 0.0, 100.0, 0.0));
        layer.set_adjust(-50.0, 500.0);
        assert_eq!((layer.brightness, layer.contrast), (0.0, MAX_ADJUST));
    }

    #[test]
    fn test_clamp_all_repairs_direct_writes() {
        let mut layer = Layer::new(50.0, 50.0, 40.0, 40.0);
        layer.w = 1e6;
        layer.h = -3.0;
        layer.brightness = f64::NAN;
        layer.shadow.blur = 1e7;
        layer.stroke.width = 1e7;
        layer.clamp_all();

        assert_eq!((layer.w, layer.h), (100.0, 0.0));
        assert_eq!(layer.brightness, 0.0);
        assert_eq!(layer.shadow.blur, crate::model::MAX_EFFECT_SIZE);
        assert_eq!(layer.stroke.width, crate::model::MAX_EFFECT_SIZE);
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&LayerKind::Signature).unwrap(), "\"sig\"");
        assert_eq!(serde_json::to_string(&LayerKind::Photo).unwrap(), "\"photo\"");
    }
}
