use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{non_negative_area, not_blank, ValidationErrors};
use super::RecordId;

/// Kind of real-estate unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Apartment,
    Commercial,
    Garage,
    Storage,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Apartment,
        UnitCategory::Commercial,
        UnitCategory::Garage,
        UnitCategory::Storage,
    ];

    /// Stored and query-string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Apartment => "apartment",
            UnitCategory::Commercial => "commercial",
            UnitCategory::Garage => "garage",
            UnitCategory::Storage => "storage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitCategory::Apartment => "Apartment",
            UnitCategory::Commercial => "Commercial",
            UnitCategory::Garage => "Garage",
            UnitCategory::Storage => "Storage",
        }
    }

    /// Parses the stored representation. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// `(value, label)` pairs for the category choice list.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|c| (c.as_str(), c.label())).collect()
    }
}

/// A real-estate unit, owned by exactly one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: RecordId,
    pub category: UnitCategory,
    pub address: String,
    pub floor: String,
    pub door: String,
    pub area: f64,
    pub rooms: Option<i32>,
    pub owner_id: RecordId,
}

impl Unit {
    /// Human readable label, e.g. `Apartment · Calle Mayor 12A`.
    pub fn display_name(&self) -> String {
        Self::label(self.category, &self.address, &self.floor, &self.door)
    }

    /// The display label built from the individual columns.
    pub fn label(category: UnitCategory, address: &str, floor: &str, door: &str) -> String {
        format!("{} · {}{}{}", category.label(), address, floor, door)
            .trim()
            .to_string()
    }
}

/// Unit row as produced by the unit filter engine: the unit, its owner's
/// name and whether a contract covers the reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitListing {
    #[serde(flatten)]
    pub unit: Unit,
    pub owner_name: String,
    pub rented: bool,
}

/// Create/edit payload for a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UnitInput {
    pub category: UnitCategory,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub floor: String,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub door: String,
    #[validate(custom(function = "non_negative_area"))]
    pub area: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub rooms: Option<i32>,
    pub owner_id: RecordId,
}

impl UnitInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }
}
