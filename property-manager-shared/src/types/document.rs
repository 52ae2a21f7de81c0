use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::ValidationErrors;
use super::RecordId;

/// A document attached to a unit. `file_path` is relative to the blob store
/// root; `uploaded_at` is set at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub unit_id: RecordId,
    pub description: String,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// The description, or the file name when the description is blank.
    pub fn display_name(&self) -> String {
        if self.description.trim().is_empty() {
            self.file_path
                .rsplit('/')
                .next()
                .unwrap_or(&self.file_path)
                .to_string()
        } else {
            self.description.clone()
        }
    }
}

/// Edit payload for a document. The stored file cannot be replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DocumentInput {
    pub unit_id: RecordId,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: String,
}

impl DocumentInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }
}

/// A document whose blob has already been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub unit_id: RecordId,
    pub description: String,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_file_name() {
        let mut doc = Document {
            id: 1,
            unit_id: 1,
            description: String::new(),
            file_path: "documents/1b2c-lease.pdf".to_string(),
            uploaded_at: Utc::now(),
        };
        assert_eq!(doc.display_name(), "1b2c-lease.pdf");
        doc.description = "Signed lease".to_string();
        assert_eq!(doc.display_name(), "Signed lease");
    }

    #[test]
    fn test_input_limits_description() {
        let input = DocumentInput {
            unit_id: 1,
            description: "d".repeat(201),
        };
        assert_eq!(
            input.check().unwrap_err().field("description").unwrap(),
            ["Ensure this value has at most 200 characters (it has 201)."]
        );
    }
}
