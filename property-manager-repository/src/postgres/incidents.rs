use async_trait::async_trait;
use chrono::NaiveDate;
use property_manager_shared::{
    Incident, IncidentCriteria, IncidentInput, Page, PageRequest, RecordId,
};
use sqlx::{Postgres, QueryBuilder};

use super::rows::IncidentRow;
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::IncidentRepository;

const INCIDENT_COLUMNS: &str = "i.id, i.unit_id, i.description, i.status, i.reported_on, i.resolved_on";

fn push_incident_conditions(qb: &mut QueryBuilder<'_, Postgres>, criteria: &IncidentCriteria) {
    qb.push(" FROM incidents i WHERE TRUE");
    if let Some(unit_id) = criteria.unit_id {
        qb.push(" AND i.unit_id = ").push_bind(unit_id);
    }
    if let Some(status) = &criteria.status {
        qb.push(" AND LOWER(i.status) = LOWER(")
            .push_bind(status.clone())
            .push(")");
    }
}

#[async_trait]
impl IncidentRepository for PostgresRecordStore {
    async fn list_incidents(
        &self,
        criteria: &IncidentCriteria,
        page: PageRequest,
    ) -> Result<Page<Incident>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_incident_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!("SELECT {INCIDENT_COLUMNS}"));
        push_incident_conditions(&mut select, criteria);
        select.push(" ORDER BY i.reported_on DESC, i.id DESC");

        self.fetch_page(count, select, page, |row: IncidentRow| Ok(row.into()))
            .await
    }

    async fn get_incident(&self, id: RecordId) -> Result<Incident, RepositoryError> {
        let row: Option<IncidentRow> = sqlx::query_as(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents i WHERE i.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Incident::from)
            .ok_or_else(|| RepositoryError::not_found("incident", id))
    }

    async fn create_incident(
        &self,
        input: &IncidentInput,
        reported_on: NaiveDate,
    ) -> Result<Incident, RepositoryError> {
        let row: IncidentRow = sqlx::query_as(&format!(
            "INSERT INTO incidents AS i (unit_id, description, status, reported_on, resolved_on) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {INCIDENT_COLUMNS}"
        ))
        .bind(input.unit_id)
        .bind(&input.description)
        .bind(input.effective_status())
        .bind(reported_on)
        .bind(input.resolved_on)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_incident(
        &self,
        id: RecordId,
        input: &IncidentInput,
    ) -> Result<Incident, RepositoryError> {
        let row: Option<IncidentRow> = sqlx::query_as(&format!(
            "UPDATE incidents AS i SET unit_id = $2, description = $3, status = $4, \
             resolved_on = $5 WHERE i.id = $1 RETURNING {INCIDENT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.unit_id)
        .bind(&input.description)
        .bind(input.effective_status())
        .bind(input.resolved_on)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Incident::from)
            .ok_or_else(|| RepositoryError::not_found("incident", id))
    }

    async fn delete_incident(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("incident", id));
        }
        Ok(())
    }
}
