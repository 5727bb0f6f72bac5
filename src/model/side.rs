//! One face of the card.

use serde::{Deserialize, Serialize};

use super::{Field, Layer, LayerKind};

/// Front or back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideKind {
    #[default]
    Front,
    Back,
}

impl SideKind {
    pub fn name(self) -> &'static str {
        match self {
            SideKind::Front => "front",
            SideKind::Back => "back",
        }
    }

    pub fn other(self) -> SideKind {
        match self {
            SideKind::Front => SideKind::Back,
            SideKind::Back => SideKind::Front,
        }
    }
}

/// Fields render in list order, later entries on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    #[serde(default)]
    pub background: Option<String>,
    pub fields: Vec<Field>,
    pub photo: Layer,
    pub signature: Layer,
}

impl Side {
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Photo => &self.photo,
            LayerKind::Signature => &self.signature,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Photo => &mut self.photo,
            LayerKind::Signature => &mut self.signature,
        }
    }

    pub fn clamp_all(&mut self) {
        for field in &mut self.fields {
            field.clamp_all();
        }
        self.photo.clamp_all();
        self.signature.clamp_all();
    }
}
