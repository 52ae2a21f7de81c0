//! Error types for the property manager service.
//!
//! `AppError` covers startup and wiring; [`HttpError`] is what request
//! handlers return and knows how to render itself as a response.

mod http;

pub use http::{HttpError, HttpResult};

use property_manager_repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur while starting the service.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
