use async_trait::async_trait;
use chrono::NaiveDate;
use property_manager_shared::{
    Contract, ContractCriteria, ContractInput, ContractListing, Page, PageRequest, RecordId,
};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::rows::{ContractListingRow, ContractRow};
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::ContractRepository;

const CONTRACT_COLUMNS: &str = "c.id, c.unit_id, c.owner_id, c.start_date, c.end_date, \
     c.monthly_price, c.terms, \
     COALESCE((SELECT array_agg(ct.tenant_id ORDER BY ct.tenant_id) \
               FROM contract_tenants ct WHERE ct.contract_id = c.id), '{}') AS tenant_ids";

/// Contracts of unit `$1` covering date `$2`, the one in force first.
pub(super) const ACTIVE_CONTRACT_FILTER: &str = "WHERE c.unit_id = $1 AND c.start_date <= $2 \
     AND (c.end_date IS NULL OR c.end_date >= $2) \
     ORDER BY c.start_date DESC, c.id DESC LIMIT 1";

fn push_contract_conditions(qb: &mut QueryBuilder<'_, Postgres>, criteria: &ContractCriteria) {
    qb.push(
        " FROM contracts c JOIN units u ON u.id = c.unit_id \
         JOIN owners o ON o.id = c.owner_id WHERE TRUE",
    );
    if let Some(unit_id) = criteria.unit_id {
        qb.push(" AND c.unit_id = ").push_bind(unit_id);
    }
}

async fn select_contract(
    conn: &mut PgConnection,
    id: RecordId,
) -> Result<Option<Contract>, RepositoryError> {
    let row: Option<ContractRow> = sqlx::query_as(&format!(
        "SELECT {CONTRACT_COLUMNS} FROM contracts c WHERE c.id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Contract::from))
}

async fn replace_tenants(
    conn: &mut PgConnection,
    contract_id: RecordId,
    tenant_ids: &[RecordId],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM contract_tenants WHERE contract_id = $1")
        .bind(contract_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(
        "INSERT INTO contract_tenants (contract_id, tenant_id) \
         SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
    )
    .bind(contract_id)
    .bind(tenant_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl ContractRepository for PostgresRecordStore {
    async fn list_contracts(
        &self,
        criteria: &ContractCriteria,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_contract_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!(
            "SELECT {CONTRACT_COLUMNS}, \
             u.category AS unit_category, u.address AS unit_address, \
             u.floor AS unit_floor, u.door AS unit_door, o.name AS owner_name, \
             COALESCE((SELECT array_agg(t.name::TEXT ORDER BY t.name) \
                       FROM contract_tenants ct JOIN tenants t ON t.id = ct.tenant_id \
                       WHERE ct.contract_id = c.id), '{{}}') AS tenant_names"
        ));
        push_contract_conditions(&mut select, criteria);
        select.push(" ORDER BY c.start_date DESC, c.id DESC");

        self.fetch_page(count, select, page, |row: ContractListingRow| row.try_into())
            .await
    }

    async fn get_contract(&self, id: RecordId) -> Result<Contract, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        select_contract(&mut conn, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("contract", id))
    }

    async fn find_active_contract(
        &self,
        unit_id: RecordId,
        date: NaiveDate,
    ) -> Result<Option<Contract>, RepositoryError> {
        let row: Option<ContractRow> = sqlx::query_as(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts c {ACTIVE_CONTRACT_FILTER}"
        ))
        .bind(unit_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Contract::from))
    }

    async fn create_contract(&self, input: &ContractInput) -> Result<Contract, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id: RecordId = sqlx::query_scalar(
            "INSERT INTO contracts (unit_id, owner_id, start_date, end_date, monthly_price, terms) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(input.unit_id)
        .bind(input.owner_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.monthly_price)
        .bind(&input.terms)
        .fetch_one(&mut *tx)
        .await?;
        replace_tenants(&mut tx, id, &input.tenant_ids).await?;
        let contract = select_contract(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("contract", id))?;
        tx.commit().await?;
        Ok(contract)
    }

    async fn update_contract(
        &self,
        id: RecordId,
        input: &ContractInput,
    ) -> Result<Contract, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE contracts SET unit_id = $2, owner_id = $3, start_date = $4, end_date = $5, \
             monthly_price = $6, terms = $7 WHERE id = $1",
        )
        .bind(id)
        .bind(input.unit_id)
        .bind(input.owner_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.monthly_price)
        .bind(&input.terms)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("contract", id));
        }
        replace_tenants(&mut tx, id, &input.tenant_ids).await?;
        let contract = select_contract(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("contract", id))?;
        tx.commit().await?;
        Ok(contract)
    }

    async fn delete_contract(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("contract", id));
        }
        Ok(())
    }
}
