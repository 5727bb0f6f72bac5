//! # Cardsmith - ID Card Layout & Compositing Engine
//!
//! Cardsmith designs two-sided employee ID cards and renders them to
//! print-ready bitmaps. It provides:
//!
//! - **Template model**: positioned text fields and photo/signature layers,
//!   clamped at every mutation
//! - **Editor session**: selection, drag with optional snap, zoom and a
//!   bounded undo/redo history
//! - **Compositing**: deterministic 600×960 rendering with text wrap,
//!   shadows, outlines, tone adjustment and signature ink recolor
//! - **Persistence**: template and exported-card stores over JSON files
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cardsmith::{
//!     model::{EmployeeResource, SideKind, Template},
//!     render::{CardRenderer, FontBook},
//!     resource::ImageResolver,
//! };
//!
//! # async fn demo() -> Result<(), cardsmith::CardError> {
//! let mut template = Template::new("Staff", "Acme Corp");
//! let mut employee = EmployeeResource::new("JESUS B. ILLUSTRISIMO", "Field Engineer");
//! employee.photo_ref = Some("/images/jesus.png".into());
//! template.autofill(&employee);
//!
//! let renderer = CardRenderer::new(
//!     Arc::new(ImageResolver::new("data")?),
//!     Arc::new(FontBook::system()),
//! );
//! let front = renderer.render(SideKind::Front, &template.front, Some(&employee)).await?;
//! front.save("front.png").ok();
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Template, sides, fields, layers, typed updates |
//! | [`editor`] | Selection, drag, snap, zoom |
//! | [`history`] | Bounded undo/redo snapshots |
//! | [`render`] | Compositing pipeline |
//! | [`resource`] | Image reference resolution |
//! | [`store`] | Template and saved-card persistence |
//! | [`error`] | Error types |

pub mod editor;
pub mod error;
pub mod history;
pub mod model;
pub mod render;
pub mod resource;
pub mod store;

// Re-exports for convenience
pub use editor::EditorSession;
pub use error::CardError;
pub use model::{EmployeeResource, Side, SideKind, Template};
pub use render::CardRenderer;
