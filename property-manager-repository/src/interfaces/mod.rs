//! This module defines and re-exports the record store interfaces.
//!
//! There is one trait per entity family. [`RecordStore`] bundles them so the
//! service can hold a single `Arc<dyn RecordStore>` whatever the backend.

mod contracts;
mod documents;
mod incidents;
mod owners;
mod payment_types;
mod payments;
mod sessions;
mod tenants;
mod units;

pub use contracts::ContractRepository;
pub use documents::DocumentRepository;
pub use incidents::IncidentRepository;
pub use owners::OwnerRepository;
pub use payment_types::PaymentTypeRepository;
pub use payments::PaymentRepository;
pub use sessions::SessionRepository;
pub use tenants::TenantRepository;
pub use units::UnitRepository;

/// Every record store interface at once.
pub trait RecordStore:
    OwnerRepository
    + UnitRepository
    + TenantRepository
    + ContractRepository
    + PaymentTypeRepository
    + PaymentRepository
    + IncidentRepository
    + DocumentRepository
    + SessionRepository
{
}

impl<T> RecordStore for T where
    T: OwnerRepository
        + UnitRepository
        + TenantRepository
        + ContractRepository
        + PaymentTypeRepository
        + PaymentRepository
        + IncidentRepository
        + DocumentRepository
        + SessionRepository
{
}
