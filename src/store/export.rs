//! Saving templates and exporting rendered cards.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::info;

use super::{SavedCardStore, TemplateStore};
use crate::error::{CardError, Result};
use crate::model::{EmployeeResource, Template};
use crate::render::CardRenderer;

/// A printed card: both sides as PNG data URLs plus who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub employee_name: String,
    pub position: String,
    pub saved_at: DateTime<Utc>,
    pub front: String,
    pub back: String,
}

/// Insert or replace a template (matched by id) in the store.
///
/// A blank name is rejected before the store is touched.
pub async fn save_template<S>(store: &S, template: &Template) -> Result<()>
where
    S: TemplateStore + ?Sized,
{
    if template.name.trim().is_empty() {
        return Err(CardError::Validation("Template name is required".to_string()));
    }

    let mut templates = store.load_templates().await?;
    match templates.iter_mut().find(|t| t.id == template.id) {
        Some(existing) => *existing = template.clone(),
        None => templates.push(template.clone()),
    }
    store.store_templates(&templates).await?;

    info!(id = %template.id, name = %template.name, "template saved");
    Ok(())
}

/// Render both sides for an employee and append the result to the store.
pub async fn export_card<S>(
    renderer: &CardRenderer,
    template: &Template,
    employee: Option<&EmployeeResource>,
    store: &S,
) -> Result<SavedCard>
where
    S: SavedCardStore + ?Sized,
{
    let employee = employee
        .ok_or_else(|| CardError::Validation("Select an employee before saving".to_string()))?;

    let (front, back) = renderer.render_template(template, Some(employee)).await?;
    let card = SavedCard {
        employee_name: employee.name.clone(),
        position: employee.position.clone(),
        saved_at: Utc::now(),
        front: encode_png_data_url(&front)?,
        back: encode_png_data_url(&back)?,
    };

    let mut cards = store.load_saved_cards().await?;
    cards.push(card.clone());
    store.store_saved_cards(&cards).await?;

    info!(employee = %card.employee_name, template = %template.name, "card exported");
    Ok(card)
}

/// `data:image/png;base64,...` for a bitmap.
pub fn encode_png_data_url(image: &RgbaImage) -> Result<String> {
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| CardError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner())))
}
