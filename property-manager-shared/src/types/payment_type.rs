use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, ValidationErrors};
use super::RecordId;

/// Who is responsible for a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayerRole {
    Tenant,
    Owner,
}

impl PayerRole {
    pub const ALL: [PayerRole; 2] = [PayerRole::Tenant, PayerRole::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayerRole::Tenant => "tenant",
            PayerRole::Owner => "owner",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayerRole::Tenant => "Tenant",
            PayerRole::Owner => "Owner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|r| (r.as_str(), r.label())).collect()
    }
}

/// A category of payment (rent, electricity, insurance, ...).
///
/// `created_by`/`updated_by` hold the username of the authenticated caller
/// that performed the change; the timestamps are set by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub default_payer: Option<PayerRole>,
    pub active: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create/edit payload for a payment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaymentTypeInput {
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_payer: Option<PayerRole>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl PaymentTypeInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }
}
