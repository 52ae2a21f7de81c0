use async_trait::async_trait;
use property_manager_shared::{
    Page, PageRequest, RecordId, Tenant, TenantCriteria, TenantInput, TenantListing,
};
use sqlx::{Postgres, QueryBuilder};

use super::filters::like_pattern;
use super::rows::{TenantListingRow, TenantRow};
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::TenantRepository;

const TENANT_COLUMNS: &str = "t.id, t.name, t.national_id, t.phone, t.email, t.unit_id";

fn push_tenant_conditions(qb: &mut QueryBuilder<'_, Postgres>, criteria: &TenantCriteria) {
    qb.push(" FROM tenants t LEFT JOIN units u ON u.id = t.unit_id WHERE TRUE");
    if let Some(search) = &criteria.search {
        let pattern = like_pattern(search);
        qb.push(" AND (t.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.national_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.phone ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.address ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = criteria.category {
        qb.push(" AND u.category = ").push_bind(category.as_str());
    }
}

#[async_trait]
impl TenantRepository for PostgresRecordStore {
    async fn list_tenants(
        &self,
        criteria: &TenantCriteria,
        page: PageRequest,
    ) -> Result<Page<TenantListing>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_tenant_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!(
            "SELECT {TENANT_COLUMNS}, u.address AS unit_address, u.category AS unit_category"
        ));
        push_tenant_conditions(&mut select, criteria);
        select.push(" ORDER BY t.name, t.id");

        self.fetch_page(count, select, page, |row: TenantListingRow| row.try_into())
            .await
    }

    async fn all_tenants(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants t ORDER BY t.name, t.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn get_tenant(&self, id: RecordId) -> Result<Tenant, RepositoryError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants t WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Tenant::from)
            .ok_or_else(|| RepositoryError::not_found("tenant", id))
    }

    async fn create_tenant(&self, input: &TenantInput) -> Result<Tenant, RepositoryError> {
        let row: TenantRow = sqlx::query_as(&format!(
            "INSERT INTO tenants AS t (name, national_id, phone, email, unit_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TENANT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.national_id)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.unit_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_tenant(
        &self,
        id: RecordId,
        input: &TenantInput,
    ) -> Result<Tenant, RepositoryError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "UPDATE tenants AS t SET name = $2, national_id = $3, phone = $4, email = $5, \
             unit_id = $6 WHERE t.id = $1 RETURNING {TENANT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.national_id)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.unit_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Tenant::from)
            .ok_or_else(|| RepositoryError::not_found("tenant", id))
    }

    async fn delete_tenant(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("tenant", id));
        }
        Ok(())
    }
}
