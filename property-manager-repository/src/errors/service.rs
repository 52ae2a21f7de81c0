use property_manager_shared::{RecordId, ValidationErrors};
use thiserror::Error;

use super::{BlobStoreError, RepositoryError};

/// Errors returned by `PropertyService`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Form input failed validation; carries the messages per field.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Blob store error: {0}")]
    Blob(#[from] BlobStoreError),
}

impl ServiceError {
    /// A validation error on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepositoryError::Integrity(msg) => Self::Integrity(msg),
            other => Self::Repository(other),
        }
    }
}
