//! # Property Manager Repository
//!
//! This crate provides the record store for the property manager: the
//! per-entity interfaces, a PostgreSQL implementation, an in-memory
//! implementation with the same referential rules, a blob store for uploaded
//! documents and the [`PropertyService`] that the HTTP layer talks to.

pub mod blob;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;
pub mod service;

pub use blob::{BlobStore, FileSystemBlobStore};
pub use config::ServiceConfig;
pub use errors::{BlobStoreError, RepositoryError, ServiceError};
pub use interfaces::RecordStore;
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use service::{DocumentUpload, PropertyService};
