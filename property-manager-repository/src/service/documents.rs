use property_manager_shared::{Document, DocumentInput, NewDocument, RecordId, ValidationErrors};
use tracing::{info, warn};
use validator::Validate;

use super::{invalid_choice, PropertyService};
use crate::errors::ServiceError;

/// An uploaded document as received from a multipart form.
#[derive(Debug, Clone, Validate)]
pub struct DocumentUpload {
    pub unit_id: RecordId,
    #[validate(length(max = 200))]
    pub description: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::collect(self);
        if self.file_name.trim().is_empty() {
            errors.add("file", "No file was submitted.");
        } else if self.bytes.is_empty() {
            errors.add("file", "The submitted file is empty.");
        }
        errors.into_result()
    }
}

impl PropertyService {
    pub async fn get_document(&self, id: RecordId) -> Result<Document, ServiceError> {
        Ok(self.store.get_document(id).await?)
    }

    /// Stores the file, then the record pointing at it. When the record
    /// cannot be written the stored file is removed again.
    pub async fn create_document(&self, upload: DocumentUpload) -> Result<Document, ServiceError> {
        upload.check()?;
        self.store
            .get_unit(upload.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;

        let file_path = self.blobs.save(&upload.file_name, &upload.bytes).await?;
        let record = NewDocument {
            unit_id: upload.unit_id,
            description: upload.description,
            file_path,
        };
        match self.store.create_document(&record).await {
            Ok(document) => {
                info!(
                    document_id = document.id,
                    unit_id = document.unit_id,
                    path = %document.file_path,
                    "Stored document"
                );
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&record.file_path).await {
                    warn!(path = %record.file_path, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e.into())
            }
        }
    }

    /// Changes the unit or description of a document, keeping its file.
    pub async fn update_document(
        &self,
        id: RecordId,
        input: DocumentInput,
    ) -> Result<Document, ServiceError> {
        input.check()?;
        self.store.get_document(id).await?;
        self.store
            .get_unit(input.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;
        Ok(self
            .store
            .update_document(id, input.unit_id, &input.description)
            .await?)
    }

    /// Deletes the record, then its file. A file that cannot be removed is
    /// only logged.
    pub async fn delete_document(&self, id: RecordId) -> Result<(), ServiceError> {
        let document = self.store.delete_document(id).await?;
        if let Err(e) = self.blobs.remove(&document.file_path).await {
            warn!(
                document_id = id,
                path = %document.file_path,
                error = %e,
                "Failed to remove document file"
            );
        }
        info!(document_id = id, "Deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use property_manager_shared::{OwnerInput, UnitCategory, UnitInput};

    use super::*;
    use crate::blob::FileSystemBlobStore;
    use crate::memory::InMemoryRecordStore;

    async fn setup(root: &std::path::Path) -> (PropertyService, RecordId) {
        let service = PropertyService::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(FileSystemBlobStore::new(root)),
        );
        let owner = service
            .create_owner(OwnerInput {
                name: "Ana".to_string(),
                national_id: "X".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let unit = service
            .create_unit(UnitInput {
                category: UnitCategory::Apartment,
                address: "Calle Mayor 1".to_string(),
                floor: "2".to_string(),
                door: "B".to_string(),
                area: 80.0,
                rooms: Some(2),
                owner_id: owner.id,
            })
            .await
            .unwrap();
        (service, unit.id)
    }

    #[tokio::test]
    async fn test_create_and_delete_document() {
        let dir = tempfile::tempdir().unwrap();
        let (service, unit_id) = setup(dir.path()).await;

        let document = service
            .create_document(DocumentUpload {
                unit_id,
                description: String::new(),
                file_name: "lease.pdf".to_string(),
                bytes: b"%PDF".to_vec(),
            })
            .await
            .unwrap();
        assert!(document.file_path.ends_with("-lease.pdf"));
        assert!(dir.path().join(&document.file_path).exists());

        let renamed = service
            .update_document(
                document.id,
                DocumentInput {
                    unit_id,
                    description: "Signed lease".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.display_name(), "Signed lease");
        assert_eq!(renamed.file_path, document.file_path);

        let too_long = service
            .update_document(
                document.id,
                DocumentInput {
                    unit_id,
                    description: "x".repeat(201),
                },
            )
            .await;
        assert!(matches!(too_long, Err(ServiceError::Validation(e)) if e.field("description").is_some()));

        service.delete_document(document.id).await.unwrap();
        assert!(!dir.path().join(&document.file_path).exists());
        assert!(matches!(
            service.get_document(document.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_missing_file_and_unknown_unit() {
        let dir = tempfile::tempdir().unwrap();
        let (service, unit_id) = setup(dir.path()).await;

        let empty = service
            .create_document(DocumentUpload {
                unit_id,
                description: "Plan".to_string(),
                file_name: String::new(),
                bytes: Vec::new(),
            })
            .await;
        assert!(matches!(empty, Err(ServiceError::Validation(_))));

        let orphan = service
            .create_document(DocumentUpload {
                unit_id: 999,
                description: "Plan".to_string(),
                file_name: "plan.png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await;
        assert!(matches!(orphan, Err(ServiceError::Validation(_))));
        assert!(!dir.path().join("documents").exists());
    }
}
