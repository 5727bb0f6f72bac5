//! Pointer-to-percent geometry for drag gestures.
//!
//! Screen coordinates are in display pixels: the design card is
//! [`DESIGN_WIDTH`]×[`DESIGN_HEIGHT`] units at zoom 1. Model coordinates are
//! percent of the card.

use serde::{Deserialize, Serialize};

use crate::model::{Align, LayerKind, Side};

pub const DESIGN_WIDTH: f64 = 300.0;
pub const DESIGN_HEIGHT: f64 = 480.0;

/// Grid step, in percent, used when snapping is on.
pub const SNAP_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Something on the active side that can be selected and dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Target {
    Field(String),
    Layer(LayerKind),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        target: Target,
        /// Pointer minus the entity's on-screen anchor at pointer-down.
        offset: Point,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

/// Anchor position of a visible target in screen coordinates.
///
/// Fields anchor at their text origin (mirrored for right alignment),
/// layers at their rectangle center. Hidden or missing targets have none.
pub fn screen_anchor(side: &Side, target: &Target, zoom: f64) -> Option<Point> {
    let (px, py) = match target {
        Target::Field(id) => {
            let field = side.field(id).filter(|f| f.visible)?;
            (field.anchor_x_from_left(), field.y)
        }
        Target::Layer(kind) => {
            let layer = Some(side.layer(*kind)).filter(|l| l.visible)?;
            (layer.x, layer.y)
        }
    };
    Some(Point::new(
        px / 100.0 * DESIGN_WIDTH * zoom,
        py / 100.0 * DESIGN_HEIGHT * zoom,
    ))
}

/// Percent position for a pointer, as seen from the left/top edges.
pub fn percent_from_pointer(pointer: Point, offset: Point, zoom: f64, snap: bool) -> (f64, f64) {
    let x = (pointer.x - offset.x) / zoom / DESIGN_WIDTH * 100.0;
    let y = (pointer.y - offset.y) / zoom / DESIGN_HEIGHT * 100.0;
    (snap_clamp(x, snap), snap_clamp(y, snap))
}

fn snap_clamp(value: f64, snap: bool) -> f64 {
    let value = if snap {
        (value / SNAP_STEP).round() * SNAP_STEP
    } else {
        value
    };
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

/// Write a left/top-relative position into the target, honoring the
/// right-alignment convention for fields.
pub fn apply_position(side: &mut Side, target: &Target, x: f64, y: f64) {
    match target {
        Target::Field(id) => {
            if let Some(field) = side.field_mut(id) {
                let stored_x = match field.align {
                    Align::Right => 100.0 - x,
                    Align::Left | Align::Center => x,
                };
                field.set_position(stored_x, y);
            }
        }
        Target::Layer(kind) => side.layer_mut(*kind).set_position(x, y),
    }
}
