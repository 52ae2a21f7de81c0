use async_trait::async_trait;
use property_manager_shared::{Document, DocumentCriteria, NewDocument, Page, PageRequest, RecordId};
use sqlx::{Postgres, QueryBuilder};

use super::rows::DocumentRow;
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::DocumentRepository;

const DOCUMENT_COLUMNS: &str = "d.id, d.unit_id, d.description, d.file_path, d.uploaded_at";

fn push_document_conditions(qb: &mut QueryBuilder<'_, Postgres>, criteria: &DocumentCriteria) {
    qb.push(" FROM documents d WHERE TRUE");
    if let Some(unit_id) = criteria.unit_id {
        qb.push(" AND d.unit_id = ").push_bind(unit_id);
    }
}

#[async_trait]
impl DocumentRepository for PostgresRecordStore {
    async fn list_documents(
        &self,
        criteria: &DocumentCriteria,
        page: PageRequest,
    ) -> Result<Page<Document>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_document_conditions(&mut count, criteria);

        let mut select = QueryBuilder::new(format!("SELECT {DOCUMENT_COLUMNS}"));
        push_document_conditions(&mut select, criteria);
        select.push(" ORDER BY d.uploaded_at DESC, d.id DESC");

        self.fetch_page(count, select, page, |row: DocumentRow| Ok(row.into()))
            .await
    }

    async fn get_document(&self, id: RecordId) -> Result<Document, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE d.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::from)
            .ok_or_else(|| RepositoryError::not_found("document", id))
    }

    async fn create_document(&self, document: &NewDocument) -> Result<Document, RepositoryError> {
        let row: DocumentRow = sqlx::query_as(&format!(
            "INSERT INTO documents AS d (unit_id, description, file_path, uploaded_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(document.unit_id)
        .bind(&document.description)
        .bind(&document.file_path)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_document(
        &self,
        id: RecordId,
        unit_id: RecordId,
        description: &str,
    ) -> Result<Document, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "UPDATE documents AS d SET unit_id = $2, description = $3 \
             WHERE d.id = $1 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(unit_id)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::from)
            .ok_or_else(|| RepositoryError::not_found("document", id))
    }

    async fn delete_document(&self, id: RecordId) -> Result<Document, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "DELETE FROM documents AS d WHERE d.id = $1 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::from)
            .ok_or_else(|| RepositoryError::not_found("document", id))
    }
}
