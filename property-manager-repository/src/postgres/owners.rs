use async_trait::async_trait;
use property_manager_shared::{
    Owner, OwnerCriteria, OwnerInput, OwnerSummary, Page, PageRequest, RecordId,
};
use sqlx::{Postgres, QueryBuilder};

use super::filters::like_pattern;
use super::rows::{OwnerRow, OwnerSummaryRow};
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::OwnerRepository;

const OWNER_COLUMNS: &str = "o.id, o.name, o.national_id, o.phone, o.email, o.address";

fn push_owner_conditions(qb: &mut QueryBuilder<'_, Postgres>, criteria: &OwnerCriteria) {
    qb.push(" FROM owners o WHERE TRUE");
    if let Some(search) = &criteria.search {
        let pattern = like_pattern(search);
        qb.push(" AND (o.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.national_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl OwnerRepository for PostgresRecordStore {
    async fn list_owners(
        &self,
        criteria: &OwnerCriteria,
        page: PageRequest,
    ) -> Result<Page<OwnerSummary>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_owner_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!(
            "SELECT {OWNER_COLUMNS}, \
             (SELECT COUNT(*) FROM units u WHERE u.owner_id = o.id) AS unit_count"
        ));
        push_owner_conditions(&mut select, criteria);
        select.push(" ORDER BY o.name, o.id");

        self.fetch_page(count, select, page, |row: OwnerSummaryRow| Ok(row.into()))
            .await
    }

    async fn all_owners(&self) -> Result<Vec<Owner>, RepositoryError> {
        let rows: Vec<OwnerRow> = sqlx::query_as(&format!(
            "SELECT {OWNER_COLUMNS} FROM owners o ORDER BY o.name, o.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Owner::from).collect())
    }

    async fn get_owner(&self, id: RecordId) -> Result<Owner, RepositoryError> {
        let row: Option<OwnerRow> = sqlx::query_as(&format!(
            "SELECT {OWNER_COLUMNS} FROM owners o WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Owner::from)
            .ok_or_else(|| RepositoryError::not_found("owner", id))
    }

    async fn create_owner(&self, input: &OwnerInput) -> Result<Owner, RepositoryError> {
        let row: OwnerRow = sqlx::query_as(
            r#"
            INSERT INTO owners AS o (name, national_id, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING o.id, o.name, o.national_id, o.phone, o.email, o.address
            "#,
        )
        .bind(&input.name)
        .bind(&input.national_id)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_owner(&self, id: RecordId, input: &OwnerInput) -> Result<Owner, RepositoryError> {
        let row: Option<OwnerRow> = sqlx::query_as(
            r#"
            UPDATE owners AS o
            SET name = $2, national_id = $3, phone = $4, email = $5, address = $6
            WHERE o.id = $1
            RETURNING o.id, o.name, o.national_id, o.phone, o.email, o.address
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.national_id)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Owner::from)
            .ok_or_else(|| RepositoryError::not_found("owner", id))
    }

    async fn delete_owner(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("owner", id));
        }
        Ok(())
    }
}
