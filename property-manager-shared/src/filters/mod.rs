//! List filter criteria.
//!
//! Criteria are parsed from raw query-string parameters. All supplied criteria
//! are combined conjunctively; blank values and values that fail to parse are
//! ignored, with one deliberate exception: a payment-type id that is not an
//! integer makes the payment filter unsatisfiable (see
//! [`PaymentTypeCriterion::Unmatchable`]).
//!
//! Each criteria type exposes a `matches` predicate and a `compare` ordering so
//! that every store backend can share the same semantics; the PostgreSQL
//! backend translates the same criteria to SQL.

mod params;
mod payment_filter;
mod records;
mod sort;
mod unit_filter;

pub use params::ListParams;
pub use payment_filter::{PaymentFilter, PaymentOrdering, PaymentSortKey, PaymentTypeCriterion};
pub use records::{
    ContractCriteria, DocumentCriteria, IncidentCriteria, OwnerCriteria, PaymentTypeCriteria,
    TenantCriteria,
};
pub use sort::{compare_text, SortDirection};
pub use unit_filter::{RentalStatus, UnitFilter, UnitOrdering, UnitSortKey};
