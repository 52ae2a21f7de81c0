use async_trait::async_trait;
use chrono::NaiveDate;
use property_manager_shared::{
    Page, PageRequest, RecordId, Unit, UnitFilter, UnitInput, UnitListing,
};
use sqlx::QueryBuilder;

use super::filters::{push_covering_contracts, push_unit_conditions, push_unit_ordering};
use super::rows::{UnitListingRow, UnitRow};
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::UnitRepository;

const UNIT_COLUMNS: &str =
    "u.id, u.category, u.address, u.floor, u.door, u.area, u.rooms, u.owner_id";

#[async_trait]
impl UnitRepository for PostgresRecordStore {
    async fn list_units(
        &self,
        filter: &UnitFilter,
        today: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<UnitListing>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_unit_conditions(&mut count, filter, today);

        let mut select = QueryBuilder::new(format!(
            "SELECT {UNIT_COLUMNS}, o.name AS owner_name, EXISTS ("
        ));
        push_covering_contracts(&mut select, today);
        select.push(") AS rented");
        push_unit_conditions(&mut select, filter, today);
        push_unit_ordering(&mut select, filter);

        self.fetch_page(count, select, page, |row: UnitListingRow| row.try_into())
            .await
    }

    async fn all_units(&self) -> Result<Vec<Unit>, RepositoryError> {
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {UNIT_COLUMNS} FROM units u ORDER BY u.address, u.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Unit::try_from).collect()
    }

    async fn get_unit(&self, id: RecordId) -> Result<Unit, RepositoryError> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "SELECT {UNIT_COLUMNS} FROM units u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("unit", id))?
            .try_into()
    }

    async fn create_unit(&self, input: &UnitInput) -> Result<Unit, RepositoryError> {
        let row: UnitRow = sqlx::query_as(&format!(
            "INSERT INTO units AS u (category, address, floor, door, area, rooms, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {UNIT_COLUMNS}"
        ))
        .bind(input.category.as_str())
        .bind(&input.address)
        .bind(&input.floor)
        .bind(&input.door)
        .bind(input.area)
        .bind(input.rooms)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_unit(&self, id: RecordId, input: &UnitInput) -> Result<Unit, RepositoryError> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "UPDATE units AS u SET category = $2, address = $3, floor = $4, door = $5, \
             area = $6, rooms = $7, owner_id = $8 WHERE u.id = $1 RETURNING {UNIT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.category.as_str())
        .bind(&input.address)
        .bind(&input.floor)
        .bind(&input.door)
        .bind(input.area)
        .bind(input.rooms)
        .bind(input.owner_id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("unit", id))?
            .try_into()
    }

    async fn delete_unit(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("unit", id));
        }
        Ok(())
    }
}
