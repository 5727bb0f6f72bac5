//! # Selection & Drag Controller
//!
//! Turns pointer input and attribute edits into template mutations.
//!
//! ```
//! use cardsmith::editor::{EditorSession, Point, Target};
//! use cardsmith::model::{LayerKind, Template};
//!
//! let mut session = EditorSession::new(Template::new("Staff", "Acme"));
//! session.set_snap(true);
//!
//! session.pointer_down(Point::new(150.0, 150.0), Some(Target::Layer(LayerKind::Photo)));
//! session.pointer_move(Point::new(180.0, 160.0));
//! session.pointer_move(Point::new(200.0, 170.0));
//! session.pointer_up();
//!
//! // One gesture, one undo step.
//! assert_eq!(session.history().len(), 2);
//! ```

pub mod drag;
mod session;

pub use drag::{DESIGN_HEIGHT, DESIGN_WIDTH, DragState, Point, SNAP_STEP, Target};
pub use session::{EditorSession, MAX_ZOOM, MIN_ZOOM, Selection};
