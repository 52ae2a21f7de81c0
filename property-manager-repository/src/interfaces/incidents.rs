use chrono::NaiveDate;
use property_manager_shared::{Incident, IncidentCriteria, IncidentInput, Page, PageRequest, RecordId};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Incidents matching `criteria`, most recently reported first.
    async fn list_incidents(
        &self,
        criteria: &IncidentCriteria,
        page: PageRequest,
    ) -> Result<Page<Incident>, RepositoryError>;

    async fn get_incident(&self, id: RecordId) -> Result<Incident, RepositoryError>;

    async fn create_incident(
        &self,
        input: &IncidentInput,
        reported_on: NaiveDate,
    ) -> Result<Incident, RepositoryError>;

    /// Leaves the report date untouched.
    async fn update_incident(
        &self,
        id: RecordId,
        input: &IncidentInput,
    ) -> Result<Incident, RepositoryError>;

    async fn delete_incident(&self, id: RecordId) -> Result<(), RepositoryError>;
}
