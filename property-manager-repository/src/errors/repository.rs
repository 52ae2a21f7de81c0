use property_manager_shared::RecordId;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Represents errors that can occur within the record store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: RecordId },

    /// A write was rejected because it would break a uniqueness or
    /// referential rule, e.g. deleting a payment type still in use.
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: RecordId) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if matches!(
                db_error.kind(),
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation
            ) {
                return Self::Integrity(db_error.message().to_string());
            }
        }
        Self::Database(error)
    }
}
