use chrono::NaiveDate;
use property_manager_shared::{
    Contract, ContractCriteria, ContractInput, ContractListing, Page, PageRequest, RecordId,
};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait ContractRepository: Send + Sync {
    /// Contracts matching `criteria`, newest start date first.
    async fn list_contracts(
        &self,
        criteria: &ContractCriteria,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, RepositoryError>;

    async fn get_contract(&self, id: RecordId) -> Result<Contract, RepositoryError>;

    /// The contract of `unit_id` covering `date` with the latest start date.
    /// Ties on the start date go to the highest id.
    async fn find_active_contract(
        &self,
        unit_id: RecordId,
        date: NaiveDate,
    ) -> Result<Option<Contract>, RepositoryError>;

    async fn create_contract(&self, input: &ContractInput) -> Result<Contract, RepositoryError>;

    async fn update_contract(
        &self,
        id: RecordId,
        input: &ContractInput,
    ) -> Result<Contract, RepositoryError>;

    /// Payments linked to the contract keep existing with no contract.
    async fn delete_contract(&self, id: RecordId) -> Result<(), RepositoryError>;
}
