//! # Property Manager Shared
//!
//! This crate defines the data structures shared by the property manager
//! crates: the persisted records (owners, units, tenants, contracts, payment
//! types, payments, incidents and documents), the form inputs with their
//! validation rules, the list filter criteria and the list view models.
//!
//! Nothing in here performs I/O. The filter criteria know how to parse
//! themselves from raw query parameters and how to evaluate against a record,
//! which lets every store backend agree on the same semantics.

pub mod filters;
pub mod types;
pub mod views;

pub use filters::{
    compare_text, ContractCriteria, DocumentCriteria, IncidentCriteria, ListParams, OwnerCriteria,
    PaymentFilter, PaymentOrdering, PaymentTypeCriteria, PaymentTypeCriterion, RentalStatus,
    SortDirection, TenantCriteria, UnitFilter, UnitOrdering,
};
pub use types::*;
