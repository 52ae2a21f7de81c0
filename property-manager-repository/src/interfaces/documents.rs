use property_manager_shared::{Document, DocumentCriteria, NewDocument, Page, PageRequest, RecordId};

use crate::errors::RepositoryError;

#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Documents matching `criteria`, most recent upload first.
    async fn list_documents(
        &self,
        criteria: &DocumentCriteria,
        page: PageRequest,
    ) -> Result<Page<Document>, RepositoryError>;

    async fn get_document(&self, id: RecordId) -> Result<Document, RepositoryError>;

    /// Stamps the upload time.
    async fn create_document(&self, document: &NewDocument) -> Result<Document, RepositoryError>;

    /// Moves the document to another unit or changes its description. The
    /// stored file is never replaced.
    async fn update_document(
        &self,
        id: RecordId,
        unit_id: RecordId,
        description: &str,
    ) -> Result<Document, RepositoryError>;

    /// Returns the removed record so the caller can discard its file.
    async fn delete_document(&self, id: RecordId) -> Result<Document, RepositoryError>;
}
