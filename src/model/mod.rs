//! # Template Model
//!
//! Data structures for a two-sided ID card: [`Template`] holds a front and a
//! back [`Side`]; each side has an ordered list of text [`Field`]s plus a
//! photo and a signature [`Layer`].
//!
//! All positions and sizes are percentages of the card dimensions so a
//! template renders identically at any zoom or output resolution.
//!
//! ## Ranges
//!
//! The struct fields are public plain data. The declared ranges are kept
//! by the builders and setters, by [`FieldUpdate`]/[`LayerUpdate`], by
//! `clamp_all` and by [`Template::from_json`]. A direct write such as
//! `field.x = 250.0` is stored as is until one of those runs again; the
//! renderer works on a clamped copy, so such a value never reaches a
//! buffer size.

mod color;
pub mod defaults;
mod employee;
pub mod field;
mod layer;
mod side;
mod style;
mod template;
mod update;

pub use color::Color;
pub use employee::EmployeeResource;
pub use field::{Align, Field};
pub use layer::{Layer, LayerKind};
pub use side::{Side, SideKind};
pub use style::{MAX_EFFECT_SIZE, Overlay, Shadow, Stroke};
pub use template::Template;
pub use update::{FieldUpdate, LayerUpdate, Typography};

/// Clamp to `[lo, hi]`, mapping NaN to `lo`.
pub(crate) fn clamp_range(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    clamp_range(value, 0.0, 100.0)
}
