//! Read-only employee view used for auto-fill and image sourcing.

use serde::{Deserialize, Serialize};

/// What the roster collaborator hands the engine for one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResource {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub employee_code: Option<String>,
    #[serde(default)]
    pub photo_ref: Option<String>,
    #[serde(default)]
    pub signature_ref: Option<String>,
}

impl EmployeeResource {
    pub fn new(name: &str, position: &str) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
            ..Default::default()
        }
    }

    /// First whitespace-separated token of the name.
    pub fn nickname(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// The employee code, if present and not blank.
    pub fn code(&self) -> Option<&str> {
        self.employee_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
