//! Typed partial updates for fields and layers.
//!
//! Each variant covers one attribute group and clamps its own values when
//! applied, so no out-of-range number reaches the stored model.

use serde::{Deserialize, Serialize};

use super::{Align, Color, Field, Layer, Overlay, Shadow, Stroke, field::clamp_font_size};

/// Font and color settings of a field. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub align: Option<Align>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldUpdate {
    Text { value: String },
    Position { x: f64, y: f64 },
    Typography(Typography),
    Visibility { visible: bool },
    Stroke(Stroke),
    Shadow(Shadow),
    Background(Overlay),
}

impl FieldUpdate {
    pub fn apply(&self, field: &mut Field) {
        match self {
            FieldUpdate::Text { value } => field.value = value.clone(),
            FieldUpdate::Position { x, y } => field.set_position(*x, *y),
            FieldUpdate::Typography(t) => {
                if let Some(size) = t.font_size {
                    field.font_size = clamp_font_size(size);
                }
                if let Some(color) = t.color {
                    field.color = color;
                }
                if let Some(bold) = t.bold {
                    field.bold = bold;
                }
                if let Some(italic) = t.italic {
                    field.italic = italic;
                }
                if let Some(align) = t.align {
                    field.align = align;
                }
            }
            FieldUpdate::Visibility { visible } => field.visible = *visible,
            FieldUpdate::Stroke(stroke) => field.stroke = stroke.clamped(),
            FieldUpdate::Shadow(shadow) => field.shadow = shadow.clamped(),
            FieldUpdate::Background(overlay) => field.background = overlay.clamped(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerUpdate {
    Position { x: f64, y: f64 },
    Size { w: f64, h: f64 },
    Visibility { visible: bool },
    Stroke(Stroke),
    Shadow(Shadow),
    Overlay(Overlay),
    Adjust { brightness: f64, contrast: f64 },
    Colorize { enabled: bool, color: Color },
}

impl LayerUpdate {
    pub fn apply(&self, layer: &mut Layer) {
        match self {
            LayerUpdate::Position { x, y } => layer.set_position(*x, *y),
            LayerUpdate::Size { w, h } => layer.set_size(*w, *h),
            LayerUpdate::Visibility { visible } => layer.visible = *visible,
            LayerUpdate::Stroke(stroke) => layer.stroke = stroke.clamped(),
            LayerUpdate::Shadow(shadow) => layer.shadow = shadow.clamped(),
            LayerUpdate::Overlay(overlay) => layer.overlay = overlay.clamped(),
            LayerUpdate::Adjust {
                brightness,
                contrast,
            } => layer.set_adjust(*brightness, *contrast),
            LayerUpdate::Colorize { enabled, color } => {
                layer.colorize = *enabled;
                layer.colorize_color = *color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typography_keeps_unset_values() {
        let mut field = Field::new("f", "F", "x").size(14.0).bold();
        FieldUpdate::Typography(Typography {
            italic: Some(true),
            ..Default::default()
        })
        .apply(&mut field);
        assert_eq!(field.font_size, 14.0);
        assert!(field.bold);
        assert!(field.italic);
    }

    #[test]
    fn test_typography_clamps_font_size() {
        let mut field = Field::new("f", "F", "x");
        FieldUpdate::Typography(Typography {
            font_size: Some(2.0),
            ..Default::default()
        })
        .apply(&mut field);
        assert_eq!(field.font_size, 6.0);
    }

    #[test]
    fn test_layer_overlay_clamps() {
        let mut layer = Layer::new(50.0, 50.0, 10.0, 10.0);
        LayerUpdate::Overlay(Overlay {
            color: Color::WHITE,
            opacity: -20.0,
        })
        .apply(&mut layer);
        assert_eq!(layer.overlay.opacity, 0.0);
    }

    #[test]
    fn test_update_json_shape() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"kind":"position","x":12.5,"y":140}"#).unwrap();
        let mut field = Field::new("f", "F", "x");
        update.apply(&mut field);
        assert_eq!((field.x, field.y), (12.5, 100.0));
    }
}
