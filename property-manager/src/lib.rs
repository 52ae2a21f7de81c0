//! # Property Manager
//!
//! HTTP service for managing rental properties: owners, units, tenants,
//! contracts, payment types, payments, incidents and documents.
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`server`]: Router, session authentication, form parsing and handlers
//! - [`errors`]: Startup and HTTP error types
//!
//! The record store and the service layer live in
//! `property-manager-repository`; domain types and filters in
//! `property-manager-shared`.

pub mod config;
pub mod errors;
pub mod server;

pub use config::{Dependencies, Settings};
pub use errors::{AppError, HttpError};
