//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Physical condition of a catalog entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Condition {
    #[default]
    #[serde(alias = "Baik")]
    Good,
    Maintenance,
    #[serde(alias = "Rusak")]
    Broken,
}

/// Equipment record: one catalog entry standing for a pool of identical units
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Total units owned
    pub stock: u32,
    /// Units currently rentable, never above `stock`
    pub available: u32,
    /// Daily rate
    pub price: u64,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub fn is_rentable(&self) -> bool {
        self.available > 0
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub stock: u32,
    /// Defaults to `stock`
    pub available: Option<u32>,
    pub price: u64,
    pub condition: Option<Condition>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Update equipment request; only provided fields are written
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Equipment name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_condition_spellings() {
        let c: Condition = serde_json::from_str("\"Baik\"").unwrap();
        assert_eq!(c, Condition::Good);
        let c: Condition = serde_json::from_str("\"Rusak\"").unwrap();
        assert_eq!(c, Condition::Broken);
        assert_eq!(serde_json::to_string(&Condition::Good).unwrap(), "\"Good\"");
    }
}
