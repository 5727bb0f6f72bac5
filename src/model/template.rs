//! The two-sided card template and its mutation contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmployeeResource, FieldUpdate, LayerKind, LayerUpdate, Side, SideKind, defaults};
use crate::error::{CardError, Result};

/// Employee attribute a field can be auto-filled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillSource {
    Name,
    Nickname,
    Position,
    EmployeeCode,
}

const FRONT_FILL: &[(&str, FillSource)] = &[
    ("fullname", FillSource::Name),
    ("nickname", FillSource::Nickname),
    ("position", FillSource::Position),
    ("idnum", FillSource::EmployeeCode),
];

const BACK_FILL: &[(&str, FillSource)] = &[
    ("fullname", FillSource::Name),
    ("idnum", FillSource::EmployeeCode),
];

/// A complete card design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    pub created_at: DateTime<Utc>,
    pub front: Side,
    pub back: Side,
}

impl Template {
    /// A template with the stock front/back field sets.
    pub fn new(name: &str, company: &str) -> Self {
        let mut front = defaults::front_side();
        if !company.trim().is_empty()
            && let Some(field) = front.field_mut("company")
        {
            field.value = company.trim().to_uppercase();
        }

        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            company: company.to_string(),
            created_at: Utc::now(),
            front,
            back: defaults::back_side(),
        }
    }

    /// Parse a stored template, re-clamping every numeric attribute.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut template: Template = serde_json::from_str(json)?;
        template.front.clamp_all();
        template.back.clamp_all();
        Ok(template)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn side(&self, kind: SideKind) -> &Side {
        match kind {
            SideKind::Front => &self.front,
            SideKind::Back => &self.back,
        }
    }

    fn side_mut(&mut self, kind: SideKind) -> &mut Side {
        match kind {
            SideKind::Front => &mut self.front,
            SideKind::Back => &mut self.back,
        }
    }

    pub fn update_field(&mut self, kind: SideKind, field_id: &str, update: &FieldUpdate) -> Result<()> {
        let field = self
            .side_mut(kind)
            .field_mut(field_id)
            .ok_or_else(|| CardError::UnknownField(field_id.to_string()))?;
        update.apply(field);
        Ok(())
    }

    pub fn update_layer(&mut self, kind: SideKind, layer: LayerKind, update: &LayerUpdate) {
        update.apply(self.side_mut(kind).layer_mut(layer));
    }

    pub fn set_background(&mut self, kind: SideKind, image_ref: Option<String>) {
        self.side_mut(kind).background = image_ref.filter(|r| !r.trim().is_empty());
    }

    /// Replace both sides, e.g. when restoring a history snapshot.
    pub fn restore(&mut self, front: Side, back: Side) {
        self.front = front;
        self.back = back;
    }

    /// Copy employee attributes into the tagged fields of both sides.
    ///
    /// Returns the number of fields whose value changed.
    pub fn autofill(&mut self, employee: &EmployeeResource) -> usize {
        let mut changed = 0;
        for (kind, rules) in [(SideKind::Front, FRONT_FILL), (SideKind::Back, BACK_FILL)] {
            let side = self.side_mut(kind);
            for &(field_id, source) in rules {
                let value = match source {
                    FillSource::Name => Some(employee.name.as_str()),
                    FillSource::Nickname => Some(employee.nickname()),
                    FillSource::Position => Some(employee.position.as_str()),
                    FillSource::EmployeeCode => employee.code(),
                };
                if let (Some(value), Some(field)) = (value, side.field_mut(field_id))
                    && field.value != value
                {
                    field.value = value.to_string();
                    changed += 1;
                }
            }
        }
        changed
    }
}
