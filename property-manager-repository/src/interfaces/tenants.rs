use property_manager_shared::{
    Page, PageRequest, RecordId, Tenant, TenantCriteria, TenantInput, TenantListing,
};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait TenantRepository: Send + Sync {
    /// Tenants matching `criteria`, ordered by name then id.
    async fn list_tenants(
        &self,
        criteria: &TenantCriteria,
        page: PageRequest,
    ) -> Result<Page<TenantListing>, RepositoryError>;

    async fn all_tenants(&self) -> Result<Vec<Tenant>, RepositoryError>;

    async fn get_tenant(&self, id: RecordId) -> Result<Tenant, RepositoryError>;

    async fn create_tenant(&self, input: &TenantInput) -> Result<Tenant, RepositoryError>;

    async fn update_tenant(
        &self,
        id: RecordId,
        input: &TenantInput,
    ) -> Result<Tenant, RepositoryError>;

    async fn delete_tenant(&self, id: RecordId) -> Result<(), RepositoryError>;
}
