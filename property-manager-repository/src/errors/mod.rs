//! Error types for the property manager repository.
//!
//! `RepositoryError` covers record store operations, `BlobStoreError` covers
//! uploaded file storage and `ServiceError` is what the service layer returns
//! to its callers.

mod blob_store;
mod repository;
mod service;

pub use blob_store::BlobStoreError;
pub use repository::RepositoryError;
pub use service::ServiceError;
