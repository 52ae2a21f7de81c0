use property_manager_shared::{NewPayment, PageRequest, Payment, PaymentFilter, PaymentPage, RecordId};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Payments matching `filter` in the filter's order, plus the sums over
    /// every match regardless of pagination. The page and the totals come from
    /// one consistent read. An unsatisfiable filter yields an empty first page
    /// with zero totals.
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: PageRequest,
    ) -> Result<PaymentPage, RepositoryError>;

    async fn get_payment(&self, id: RecordId) -> Result<Payment, RepositoryError>;

    /// Inserts the payment linked to the contract in force for its unit on its
    /// date, resolved atomically with the insert.
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepositoryError>;

    /// Overwrites every field except the contract link, which keeps the value
    /// resolved at creation.
    async fn update_payment(
        &self,
        id: RecordId,
        payment: &NewPayment,
    ) -> Result<Payment, RepositoryError>;

    /// Flips the paid flag in place, writing only that column.
    async fn toggle_paid(&self, id: RecordId) -> Result<Payment, RepositoryError>;

    async fn delete_payment(&self, id: RecordId) -> Result<(), RepositoryError>;
}
