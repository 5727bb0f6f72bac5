//! Pretty-printed JSON lists in a data directory.
//!
//! ```text
//! <data_dir>/templates.json     card templates
//! <data_dir>/saved_cards.json   exported front/back bitmaps
//! <data_dir>/records.json       employee records with photo/signature refs
//! <data_dir>/database.json      roster imported from the HR sheet
//! <data_dir>/images/            uploaded images, referenced as /images/<file>
//! ```
//!
//! A missing file reads as an empty list.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{SavedCard, SavedCardStore, TemplateStore};
use crate::error::{CardError, Result};
use crate::model::{EmployeeResource, Template};

/// Where the JSON store keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn templates_path(&self) -> PathBuf {
        self.data_dir.join("templates.json")
    }

    pub fn saved_cards_path(&self) -> PathBuf {
        self.data_dir.join("saved_cards.json")
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.json")
    }

    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join("database.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

/// An employee registered for card printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: u64,
    pub name: String,
    pub position: String,
    /// Housing status shown on the card list, e.g. "Stay-In".
    #[serde(default)]
    pub indication: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<&EmployeeRecord> for EmployeeResource {
    fn from(record: &EmployeeRecord) -> Self {
        EmployeeResource {
            name: record.name.clone(),
            position: record.position.clone(),
            employee_code: None,
            photo_ref: record.photo.clone(),
            signature_ref: record.signature.clone(),
        }
    }
}

/// One row of the imported roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub fullname: String,
    pub position: String,
}

pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub async fn records(&self) -> Result<Vec<EmployeeRecord>> {
        read_list(&self.config.records_path()).await
    }

    pub async fn store_records(&self, records: &[EmployeeRecord]) -> Result<()> {
        write_list(&self.config.records_path(), records).await
    }

    pub async fn roster(&self) -> Result<Vec<RosterEntry>> {
        read_list(&self.config.roster_path()).await
    }

    pub async fn store_roster(&self, roster: &[RosterEntry]) -> Result<()> {
        write_list(&self.config.roster_path(), roster).await
    }

    /// Employee record by name, ignoring case and surrounding whitespace.
    pub async fn find_employee(&self, name: &str) -> Result<Option<EmployeeResource>> {
        let wanted = name.trim().to_lowercase();
        let records = self.records().await?;
        Ok(records
            .iter()
            .find(|r| r.name.trim().to_lowercase() == wanted)
            .map(EmployeeResource::from))
    }

    /// Template by exact id.
    pub async fn find_template(&self, id: &str) -> Result<Option<Template>> {
        let templates = self.load_templates().await?;
        Ok(templates.into_iter().find(|t| t.id == id))
    }
}

#[async_trait]
impl TemplateStore for JsonFileStore {
    async fn load_templates(&self) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = read_list(&self.config.templates_path()).await?;
        for template in &mut templates {
            template.front.clamp_all();
            template.back.clamp_all();
        }
        Ok(templates)
    }

    async fn store_templates(&self, templates: &[Template]) -> Result<()> {
        write_list(&self.config.templates_path(), templates).await
    }
}

#[async_trait]
impl SavedCardStore for JsonFileStore {
    async fn load_saved_cards(&self) -> Result<Vec<SavedCard>> {
        read_list(&self.config.saved_cards_path()).await
    }

    async fn store_saved_cards(&self, cards: &[SavedCard]) -> Result<()> {
        write_list(&self.config.saved_cards_path(), cards).await
    }
}

async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no file yet, empty list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(persistence(path, e)),
    };
    serde_json::from_str(&text).map_err(|e| persistence(path, e))
}

async fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| persistence(parent, e))?;
    }
    let json = serde_json::to_string_pretty(items).map_err(|e| persistence(path, e))?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| persistence(path, e))?;
    info!(path = %path.display(), items = items.len(), "saved");
    Ok(())
}

fn persistence(path: &Path, err: impl std::fmt::Display) -> CardError {
    CardError::Persistence(format!("{}: {}", path.display(), err))
}
