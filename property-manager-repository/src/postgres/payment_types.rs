use async_trait::async_trait;
use property_manager_shared::{
    Page, PageRequest, PaymentType, PaymentTypeCriteria, PaymentTypeInput, RecordId,
};
use sqlx::{Postgres, QueryBuilder};

use super::filters::like_pattern;
use super::rows::PaymentTypeRow;
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::PaymentTypeRepository;

const PAYMENT_TYPE_COLUMNS: &str = "pt.id, pt.name, pt.description, pt.default_payer, pt.active, \
     pt.created_by, pt.updated_by, pt.created_at, pt.updated_at";

fn push_payment_type_conditions(
    qb: &mut QueryBuilder<'_, Postgres>,
    criteria: &PaymentTypeCriteria,
) {
    qb.push(" FROM payment_types pt WHERE TRUE");
    if let Some(search) = &criteria.search {
        let pattern = like_pattern(search);
        qb.push(" AND (pt.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR pt.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(active) = criteria.active {
        qb.push(" AND pt.active = ").push_bind(active);
    }
    if let Some(payer) = criteria.default_payer {
        qb.push(" AND pt.default_payer = ").push_bind(payer.as_str());
    }
}

#[async_trait]
impl PaymentTypeRepository for PostgresRecordStore {
    async fn list_payment_types(
        &self,
        criteria: &PaymentTypeCriteria,
        page: PageRequest,
    ) -> Result<Page<PaymentType>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_payment_type_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!("SELECT {PAYMENT_TYPE_COLUMNS}"));
        push_payment_type_conditions(&mut select, criteria);
        select.push(" ORDER BY pt.name, pt.id");

        self.fetch_page(count, select, page, |row: PaymentTypeRow| row.try_into())
            .await
    }

    async fn active_payment_types(&self) -> Result<Vec<PaymentType>, RepositoryError> {
        let rows: Vec<PaymentTypeRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_TYPE_COLUMNS} FROM payment_types pt \
             WHERE pt.active ORDER BY pt.name, pt.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PaymentType::try_from).collect()
    }

    async fn get_payment_type(&self, id: RecordId) -> Result<PaymentType, RepositoryError> {
        let row: Option<PaymentTypeRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_TYPE_COLUMNS} FROM payment_types pt WHERE pt.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("payment type", id))?
            .try_into()
    }

    async fn create_payment_type(
        &self,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError> {
        let row: PaymentTypeRow = sqlx::query_as(&format!(
            "INSERT INTO payment_types AS pt \
             (name, description, default_payer, active, created_by, updated_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5, NOW(), NOW()) RETURNING {PAYMENT_TYPE_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.default_payer.map(|p| p.as_str()))
        .bind(input.active)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_payment_type(
        &self,
        id: RecordId,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError> {
        let row: Option<PaymentTypeRow> = sqlx::query_as(&format!(
            "UPDATE payment_types AS pt SET name = $2, description = $3, default_payer = $4, \
             active = $5, updated_by = $6, updated_at = NOW() \
             WHERE pt.id = $1 RETURNING {PAYMENT_TYPE_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.default_payer.map(|p| p.as_str()))
        .bind(input.active)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("payment type", id))?
            .try_into()
    }

    async fn delete_payment_type(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM payment_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("payment type", id));
        }
        Ok(())
    }
}
