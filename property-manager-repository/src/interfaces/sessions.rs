use property_manager_shared::Session;

use crate::errors::RepositoryError;

/// Session lookup for the identity layer.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    /// The session for `token`, expired or not.
    async fn find_session(&self, token: &str) -> Result<Option<Session>, RepositoryError>;

    /// Inserts or replaces the session with the same token.
    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError>;
}
