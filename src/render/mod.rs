//! # Rendering Module
//!
//! Turns a [`Side`](crate::model::Side) plus employee images into a 600×960
//! RGBA bitmap, independent of the editor's display zoom.
//!
//! ## Modules
//!
//! - [`canvas`]: pixel rectangles, coverage masks, source-over blending
//! - [`effects`]: gaussian shadows, outline dilation, brightness/contrast
//! - [`recolor`]: signature ink recolor
//! - [`fonts`]: system outline fonts with a built-in bitmap fallback
//! - [`text`]: word wrap, line layout and field drawing
//! - [`layers`]: background, photo and signature drawing
//! - [`pipeline`]: [`compose`] and the async [`CardRenderer`]
//!
//! ## Usage Example
//!
//! ```
//! use cardsmith::model::{SideKind, Template};
//! use cardsmith::render::{CardImages, FontBook, compose};
//!
//! let template = Template::new("Staff", "Acme");
//! let fonts = FontBook::builtin();
//! let bitmap = compose(SideKind::Front, &template.front, &CardImages::default(), &fonts);
//! assert_eq!(bitmap.dimensions(), (600, 960));
//! ```

pub mod canvas;
pub mod effects;
pub mod fonts;
pub mod layers;
pub mod pipeline;
pub mod recolor;
pub mod text;

pub use fonts::{Face, FontBook};
pub use layers::FALLBACK_BACKGROUND;
pub use pipeline::{CARD_HEIGHT, CARD_WIDTH, CardImages, CardRenderer, RENDER_SCALE, compose};
pub use recolor::recolor_in_place;
pub use text::{LINE_SPACING, WRAP_RATIO, wrap_words};
