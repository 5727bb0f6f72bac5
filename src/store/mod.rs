//! # Persistence
//!
//! Collaborator interfaces for saving templates and exported cards, a JSON
//! file implementation over a data directory, and the two operator actions
//! that go through them.
//!
//! Stores replace whole lists; ordering and deduplication are the caller's
//! business. A failed write never touches in-memory editor state.

mod export;
mod json_file;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Template;

pub use export::{SavedCard, encode_png_data_url, export_card, save_template};
pub use json_file::{EmployeeRecord, JsonFileStore, RosterEntry, StoreConfig};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load_templates(&self) -> Result<Vec<Template>>;
    async fn store_templates(&self, templates: &[Template]) -> Result<()>;
}

#[async_trait]
pub trait SavedCardStore: Send + Sync {
    async fn load_saved_cards(&self) -> Result<Vec<SavedCard>>;
    async fn store_saved_cards(&self, cards: &[SavedCard]) -> Result<()>;
}
