use chrono::NaiveDate;
use property_manager_shared::{Page, PageRequest, RecordId, Unit, UnitFilter, UnitInput, UnitListing};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait UnitRepository: Send + Sync {
    /// Units matching `filter` in the filter's order.
    ///
    /// Each listing is flagged as rented when a contract of the unit covers
    /// `today`, and the rental-status criterion is evaluated against that flag.
    async fn list_units(
        &self,
        filter: &UnitFilter,
        today: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<UnitListing>, RepositoryError>;

    /// Every unit ordered by address, for choice lists.
    async fn all_units(&self) -> Result<Vec<Unit>, RepositoryError>;

    async fn get_unit(&self, id: RecordId) -> Result<Unit, RepositoryError>;

    async fn create_unit(&self, input: &UnitInput) -> Result<Unit, RepositoryError>;

    async fn update_unit(&self, id: RecordId, input: &UnitInput) -> Result<Unit, RepositoryError>;

    /// Fails with an integrity error while tenants reference the unit.
    /// Otherwise removes its contracts, payments, incidents and documents too.
    async fn delete_unit(&self, id: RecordId) -> Result<(), RepositoryError>;
}
