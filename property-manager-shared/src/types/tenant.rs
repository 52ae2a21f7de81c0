use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, optional_email, ValidationErrors};
use super::{RecordId, UnitCategory};

/// A tenant, optionally linked to the unit it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: RecordId,
    pub name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub unit_id: Option<RecordId>,
}

impl Tenant {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.national_id)
    }
}

/// Tenant row in the tenant list, with the linked unit's address and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantListing {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub unit_address: Option<String>,
    pub unit_category: Option<UnitCategory>,
}

impl TenantListing {
    /// Case-insensitive substring search over name, national id, email, phone
    /// and the linked unit's address.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let t = &self.tenant;
        [&t.name, &t.national_id, &t.email, &t.phone]
            .into_iter()
            .chain(self.unit_address.as_ref())
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Create/edit payload for a tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TenantInput {
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
    pub unit_id: Option<RecordId>,
}

impl TenantInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search_includes_unit_address() {
        let listing = TenantListing {
            tenant: Tenant {
                id: 4,
                name: "Luis".to_string(),
                national_id: "999Z".to_string(),
                phone: String::new(),
                email: "luis@example.org".to_string(),
                unit_id: Some(1),
            },
            unit_address: Some("Avenida del Puerto 8".to_string()),
            unit_category: Some(UnitCategory::Apartment),
        };
        assert!(listing.matches_search("puerto"));
        assert!(listing.matches_search("LUIS"));
        assert!(listing.matches_search("999z"));
        assert!(!listing.matches_search("mayor"));
    }

    #[test]
    fn test_validate_requires_national_id() {
        let input = TenantInput {
            name: "Luis".to_string(),
            ..Default::default()
        };
        let errors = input.check().unwrap_err();
        assert!(errors.field("national_id").is_some());
        assert!(errors.field("name").is_none());
    }
}
