//! This module defines the persisted records and their form inputs.
//! It re-exports every record type so callers can import from `types` directly.

mod contract;
mod document;
mod incident;
mod owner;
mod page;
mod payment;
mod payment_type;
mod session;
mod tenant;
mod unit;
mod validation;

pub use contract::{select_active_contract, Contract, ContractInput, ContractListing};
pub use document::{Document, DocumentInput, NewDocument};
pub use incident::{Incident, IncidentInput, DEFAULT_INCIDENT_STATUS};
pub use owner::{Owner, OwnerInput, OwnerSummary};
pub use page::{Page, PageRequest};
pub use payment::{NewPayment, Payment, PaymentInput, PaymentListing, PaymentPage, PaymentTotals};
pub use payment_type::{PayerRole, PaymentType, PaymentTypeInput};
pub use session::Session;
pub use tenant::{Tenant, TenantInput, TenantListing};
pub use unit::{Unit, UnitCategory, UnitInput, UnitListing};
pub use validation::ValidationErrors;

/// Identifier type shared by every record.
pub type RecordId = i64;
