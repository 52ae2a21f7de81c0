//! Property management service.
//!
//! `PropertyService` is the API the HTTP layer uses. It validates form input,
//! resolves the contract in force for new payments, builds the list views and
//! delegates persistence to a [`RecordStore`].

mod documents;
mod listing;
mod payments;
mod records;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use property_manager_shared::{Contract, RecordId, Session};

use crate::blob::BlobStore;
use crate::config::ServiceConfig;
use crate::errors::{RepositoryError, ServiceError};
use crate::interfaces::RecordStore;

pub use documents::DocumentUpload;

/// The main service for the property manager.
///
/// Cheap to clone; the store and the blob store are shared.
#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    config: ServiceConfig,
}

impl PropertyService {
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_config(store, blobs, ServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The contract of `unit_id` in force on `date`, if any.
    ///
    /// Among the unit's contracts with `start_date <= date` that have not ended
    /// before `date`, the latest start date wins, then the highest id.
    pub async fn active_contract(
        &self,
        unit_id: RecordId,
        date: NaiveDate,
    ) -> Result<Option<Contract>, ServiceError> {
        Ok(self.store.find_active_contract(unit_id, date).await?)
    }

    /// The session for `token` when it exists and has not expired.
    pub async fn authenticate(&self, token: &str) -> Result<Option<Session>, ServiceError> {
        let session = self.store.find_session(token).await?;
        Ok(session.filter(|s| s.is_valid_at(Utc::now())))
    }

    pub async fn save_session(&self, session: &Session) -> Result<(), ServiceError> {
        Ok(self.store.save_session(session).await?)
    }
}

/// Turns a missing referenced record into a validation error on `field`.
fn invalid_choice(error: RepositoryError, field: &str) -> ServiceError {
    match error {
        RepositoryError::NotFound { .. } => ServiceError::field(
            field,
            "Select a valid choice. That choice is not one of the available choices.",
        ),
        other => other.into(),
    }
}
