use property_manager_shared::{
    Owner, OwnerCriteria, OwnerInput, OwnerSummary, Page, PageRequest, RecordId,
};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Owners matching `criteria`, ordered by name then id, with their unit counts.
    async fn list_owners(
        &self,
        criteria: &OwnerCriteria,
        page: PageRequest,
    ) -> Result<Page<OwnerSummary>, RepositoryError>;

    /// Every owner ordered by name, for choice lists.
    async fn all_owners(&self) -> Result<Vec<Owner>, RepositoryError>;

    async fn get_owner(&self, id: RecordId) -> Result<Owner, RepositoryError>;

    /// Fails with an integrity error when the national id is already taken.
    async fn create_owner(&self, input: &OwnerInput) -> Result<Owner, RepositoryError>;

    async fn update_owner(&self, id: RecordId, input: &OwnerInput) -> Result<Owner, RepositoryError>;

    /// Deletes the owner together with its units and contracts.
    async fn delete_owner(&self, id: RecordId) -> Result<(), RepositoryError>;
}
