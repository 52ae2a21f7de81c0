use property_manager_shared::{
    Page, PageRequest, PaymentType, PaymentTypeCriteria, PaymentTypeInput, RecordId,
};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait PaymentTypeRepository: Send + Sync {
    async fn list_payment_types(
        &self,
        criteria: &PaymentTypeCriteria,
        page: PageRequest,
    ) -> Result<Page<PaymentType>, RepositoryError>;

    /// Active payment types ordered by name.
    async fn active_payment_types(&self) -> Result<Vec<PaymentType>, RepositoryError>;

    async fn get_payment_type(&self, id: RecordId) -> Result<PaymentType, RepositoryError>;

    /// `username` is recorded as both creator and last editor.
    async fn create_payment_type(
        &self,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError>;

    async fn update_payment_type(
        &self,
        id: RecordId,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError>;

    /// Fails with an integrity error while payments reference the type.
    async fn delete_payment_type(&self, id: RecordId) -> Result<(), RepositoryError>;
}
