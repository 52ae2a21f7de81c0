//! Dependency initialization and wiring for the property manager.

use std::sync::Arc;

use property_manager_repository::{
    FileSystemBlobStore, InMemoryRecordStore, PostgresRecordStore, PropertyService, RecordStore,
};
use tracing::{info, warn};

use super::{Settings, StoreBackend};
use crate::errors::AppError;
use crate::server::state::AppState;

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub settings: Settings,
    /// Shared state handed to the router.
    pub state: AppState,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    pub async fn new() -> Result<Self, AppError> {
        Self::from_settings(Settings::from_env()).await
    }

    /// Connects the record store, prepares the media directory and builds the
    /// service.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the database is unreachable, the migrations fail
    ///   or the media directory cannot be created
    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        info!(
            store_backend = ?settings.store_backend,
            media_root = %settings.media_root.display(),
            addr = %settings.addr(),
            "Initializing dependencies"
        );

        let store: Arc<dyn RecordStore> = match settings.store_backend {
            StoreBackend::Postgres => {
                let database_url = settings.database_url.as_deref().ok_or_else(|| {
                    AppError::config("DATABASE_URL must be set for the postgres store backend")
                })?;
                let store = PostgresRecordStore::connect(
                    database_url,
                    settings.database_max_connections,
                )
                .await?;
                info!("Database connection established");
                if settings.run_migrations {
                    store.run_migrations().await?;
                }
                Arc::new(store)
            }
            StoreBackend::Memory => {
                warn!("Using the in-memory record store; data is lost on shutdown");
                Arc::new(InMemoryRecordStore::new())
            }
        };

        tokio::fs::create_dir_all(&settings.media_root).await?;
        let blobs = Arc::new(FileSystemBlobStore::new(settings.media_root.clone()));

        let service = PropertyService::with_config(store, blobs, settings.service.clone());
        let state = AppState::new(service, settings.login_url.clone());

        Ok(Self { settings, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[tokio::test]
    async fn test_memory_backend_creates_media_root() {
        let dir = tempfile::tempdir().unwrap();
        let media_root = dir.path().join("media");
        let settings = Settings {
            store_backend: StoreBackend::Memory,
            media_root: media_root.clone(),
            ..Default::default()
        };

        let deps = Dependencies::from_settings(settings).await.unwrap();
        assert!(media_root.is_dir());
        assert_eq!(deps.state.login_url, "/accounts/login/");
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_database_url() {
        let settings = Settings {
            store_backend: StoreBackend::Postgres,
            database_url: None,
            ..Default::default()
        };
        let result = Dependencies::from_settings(settings).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_new_reads_environment() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("MEDIA_ROOT", dir.path());
        env::set_var("LOGIN_URL", "/login/");

        let deps = Dependencies::new().await;

        env::remove_var("STORE_BACKEND");
        env::remove_var("MEDIA_ROOT");
        env::remove_var("LOGIN_URL");

        let deps = deps.unwrap();
        assert_eq!(deps.settings.store_backend, StoreBackend::Memory);
        assert_eq!(deps.state.login_url, "/login/");
    }
}
