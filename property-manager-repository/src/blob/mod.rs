//! Storage for uploaded document files.
//!
//! Blobs are addressed by a path relative to the store root, e.g.
//! `documents/0b6f...-lease.pdf`. That relative path is what document records
//! keep.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::fmt::Hyphenated;
use uuid::Uuid;

use crate::errors::BlobStoreError;

const DOCUMENTS_DIR: &str = "documents";

/// Stored paths are `documents/<uuid>-<name>` and must fit in 255 bytes.
const MAX_STORED_PATH_LEN: usize = 255;
const MAX_FILE_NAME_LEN: usize =
    MAX_STORED_PATH_LEN - DOCUMENTS_DIR.len() - Hyphenated::LENGTH - 2;

/// Extensions longer than this are not worth keeping when a name is cut.
const MAX_KEPT_EXTENSION_LEN: usize = 16;

/// Trait for persisting uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under a fresh unique name derived from `original_name`
    /// and returns the relative path.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, BlobStoreError>;

    /// Removes a previously stored blob. A missing blob is not an error.
    async fn remove(&self, relative_path: &str) -> Result<(), BlobStoreError>;
}

/// Blob store writing under a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a stored relative path, rejecting anything that could escape
    /// the root.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, BlobStoreError> {
        let path = Path::new(relative_path);
        let safe = !relative_path.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(BlobStoreError::InvalidPath(relative_path.to_string()));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, BlobStoreError> {
        let relative_path = format!(
            "{}/{}-{}",
            DOCUMENTS_DIR,
            Uuid::new_v4(),
            sanitize_file_name(original_name)
        );
        let path = self.resolve(&relative_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %relative_path, size = bytes.len(), "Stored blob");
        Ok(relative_path)
    }

    async fn remove(&self, relative_path: &str) -> Result<(), BlobStoreError> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the last path segment of an uploaded file name, replacing every
/// character outside `[A-Za-z0-9._-]` with `_`. Long names are shortened so
/// the stored path fits its column; a short extension survives the cut.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        truncate_file_name(cleaned, MAX_FILE_NAME_LEN)
    }
}

/// `name` is ASCII, so any byte offset is a char boundary.
fn truncate_file_name(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }
    let extension = name
        .rfind('.')
        .map(|dot| &name[dot..])
        .filter(|ext| ext.len() <= MAX_KEPT_EXTENSION_LEN)
        .unwrap_or_default();
    let stem = &name[..name.len() - extension.len()];
    format!("{}{}", &stem[..max_len - extension.len()], extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("lease 2024.pdf"), "lease_2024.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\plano.png"), "plano.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn test_sanitize_shortens_long_names() {
        let long = format!("{}.pdf", "a".repeat(220));
        let name = sanitize_file_name(&long);
        assert_eq!(name.len(), MAX_FILE_NAME_LEN);
        assert!(name.ends_with("aaa.pdf"));

        let odd_extension = format!("x.{}", "b".repeat(300));
        assert_eq!(sanitize_file_name(&odd_extension).len(), MAX_FILE_NAME_LEN);
        assert_eq!(sanitize_file_name("short.pdf"), "short.pdf");
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemBlobStore::new(dir.path());

        let path = store.save("contrato.pdf", b"%PDF-1.4").await.unwrap();
        assert!(path.starts_with("documents/"));
        assert!(path.ends_with("-contrato.pdf"));
        let stored = tokio::fs::read(dir.path().join(&path)).await.unwrap();
        assert_eq!(stored, b"%PDF-1.4");

        store.remove(&path).await.unwrap();
        assert!(!dir.path().join(&path).exists());
        store.remove(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_long_name_fits_stored_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemBlobStore::new(dir.path());

        let path = store
            .save(&format!("{}.pdf", "a".repeat(220)), b"x")
            .await
            .unwrap();
        assert_eq!(path.len(), MAX_STORED_PATH_LEN);
        assert!(path.ends_with(".pdf"));
        assert!(dir.path().join(&path).exists());
    }

    #[tokio::test]
    async fn test_remove_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemBlobStore::new(dir.path());
        assert!(matches!(
            store.remove("../outside.txt").await,
            Err(BlobStoreError::InvalidPath(_))
        ));
        assert!(matches!(
            store.remove("/etc/passwd").await,
            Err(BlobStoreError::InvalidPath(_))
        ));
    }
}
