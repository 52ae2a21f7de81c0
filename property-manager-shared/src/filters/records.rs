use crate::types::{
    Contract, Document, Incident, OwnerSummary, PayerRole, PaymentType, RecordId, TenantListing,
    UnitCategory,
};

use super::params::ListParams;
use super::unit_filter::contains_ignore_case;

fn yes_no(value: Option<&str>) -> Option<bool> {
    match value {
        Some("yes") => Some(true),
        Some("no") => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerCriteria {
    pub search: Option<String>,
}

impl OwnerCriteria {
    pub const KEYS: &'static [&'static str] = &["q"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            search: params.non_empty("q").map(str::to_string),
        }
    }

    pub fn matches(&self, summary: &OwnerSummary) -> bool {
        self.search
            .as_deref()
            .map_or(true, |needle| summary.owner.matches_search(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantCriteria {
    pub search: Option<String>,
    /// Category of the tenant's unit; tenants without a unit never match.
    pub category: Option<UnitCategory>,
}

impl TenantCriteria {
    pub const KEYS: &'static [&'static str] = &["q", "category"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            search: params.non_empty("q").map(str::to_string),
            category: params.non_empty("category").and_then(UnitCategory::parse),
        }
    }

    pub fn matches(&self, listing: &TenantListing) -> bool {
        if let Some(needle) = &self.search {
            if !listing.matches_search(needle) {
                return false;
            }
        }
        match self.category {
            Some(category) => listing.unit_category == Some(category),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractCriteria {
    pub unit_id: Option<RecordId>,
}

impl ContractCriteria {
    pub const KEYS: &'static [&'static str] = &["unit"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            unit_id: params.parse_lenient("unit"),
        }
    }

    pub fn matches(&self, contract: &Contract) -> bool {
        self.unit_id.map_or(true, |id| contract.unit_id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentTypeCriteria {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    pub active: Option<bool>,
    pub default_payer: Option<PayerRole>,
}

impl PaymentTypeCriteria {
    pub const KEYS: &'static [&'static str] = &["q", "active", "default_payer"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            search: params.non_empty("q").map(str::to_string),
            active: yes_no(params.non_empty("active")),
            default_payer: params.non_empty("default_payer").and_then(PayerRole::parse),
        }
    }

    pub fn matches(&self, payment_type: &PaymentType) -> bool {
        if let Some(needle) = &self.search {
            if !contains_ignore_case(&payment_type.name, needle)
                && !contains_ignore_case(&payment_type.description, needle)
            {
                return false;
            }
        }
        if matches!(self.active, Some(active) if payment_type.active != active) {
            return false;
        }
        match self.default_payer {
            Some(payer) => payment_type.default_payer == Some(payer),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentCriteria {
    pub unit_id: Option<RecordId>,
    /// Exact status, compared case-insensitively.
    pub status: Option<String>,
}

impl IncidentCriteria {
    pub const KEYS: &'static [&'static str] = &["unit", "status"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            unit_id: params.parse_lenient("unit"),
            status: params.non_empty("status").map(str::to_string),
        }
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        if matches!(self.unit_id, Some(id) if incident.unit_id != id) {
            return false;
        }
        match &self.status {
            Some(status) => incident.status.to_lowercase() == status.to_lowercase(),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCriteria {
    pub unit_id: Option<RecordId>,
}

impl DocumentCriteria {
    pub const KEYS: &'static [&'static str] = &["unit"];

    pub fn from_params(params: &ListParams) -> Self {
        Self {
            unit_id: params.parse_lenient("unit"),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.unit_id.map_or(true, |id| document.unit_id == id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::Tenant;

    fn tenant(category: Option<UnitCategory>) -> TenantListing {
        TenantListing {
            tenant: Tenant {
                id: 1,
                name: "Luis Gómez".to_string(),
                national_id: "12345678Z".to_string(),
                phone: String::new(),
                email: "luis@example.com".to_string(),
                unit_id: category.map(|_| 4),
            },
            unit_address: category.map(|_| "Calle Sol 2".to_string()),
            unit_category: category,
        }
    }

    #[test]
    fn test_tenant_category_requires_a_unit() {
        let criteria = TenantCriteria::from_params(&ListParams::parse("category=garage"));
        assert!(criteria.matches(&tenant(Some(UnitCategory::Garage))));
        assert!(!criteria.matches(&tenant(Some(UnitCategory::Apartment))));
        assert!(!criteria.matches(&tenant(None)));
    }

    #[test]
    fn test_tenant_search_covers_unit_address() {
        let criteria = TenantCriteria::from_params(&ListParams::parse("q=sol"));
        assert!(criteria.matches(&tenant(Some(UnitCategory::Garage))));
        assert!(!criteria.matches(&tenant(None)));
    }

    #[test]
    fn test_incident_status_is_case_insensitive() {
        let incident = Incident {
            id: 1,
            unit_id: 2,
            description: "Leak".to_string(),
            status: "Pending".to_string(),
            reported_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            resolved_on: None,
        };
        let criteria = IncidentCriteria::from_params(&ListParams::parse("status=pending&unit=2"));
        assert!(criteria.matches(&incident));
        let criteria = IncidentCriteria::from_params(&ListParams::parse("unit=3"));
        assert!(!criteria.matches(&incident));
        let criteria = IncidentCriteria::from_params(&ListParams::parse("unit=two"));
        assert_eq!(criteria.unit_id, None);
    }

    #[test]
    fn test_payment_type_flags() {
        let payment_type = PaymentType {
            id: 1,
            name: "Electricity".to_string(),
            description: "Monthly power bill".to_string(),
            default_payer: Some(PayerRole::Tenant),
            active: false,
            created_by: None,
            updated_by: None,
            created_at: None,
            updated_at: None,
        };
        let criteria = PaymentTypeCriteria::from_params(&ListParams::parse("q=power&active=no"));
        assert!(criteria.matches(&payment_type));
        let criteria = PaymentTypeCriteria::from_params(&ListParams::parse("active=yes"));
        assert!(!criteria.matches(&payment_type));
        let criteria = PaymentTypeCriteria::from_params(&ListParams::parse("default_payer=owner"));
        assert!(!criteria.matches(&payment_type));
    }
}
