use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, optional_email, ValidationErrors};
use super::RecordId;

/// A property owner. The national id is unique across owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: RecordId,
    pub name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Owner {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.national_id)
    }

    /// Case-insensitive substring search over name, national id, email and phone.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.name, &self.national_id, &self.email, &self.phone]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Owner row as shown in the owner list, with the number of units it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    #[serde(flatten)]
    pub owner: Owner,
    pub unit_count: i64,
}

/// Create/edit payload for an owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct OwnerInput {
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub name: String,
    #[validate(custom(function = "not_blank"), length(max = 20))]
    pub national_id: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 100), custom(function = "optional_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub address: String,
}

impl OwnerInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }
}
