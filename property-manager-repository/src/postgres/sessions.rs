use async_trait::async_trait;
use property_manager_shared::Session;

use super::rows::SessionRow;
use super::PostgresRecordStore;
use crate::errors::RepositoryError;
use crate::interfaces::SessionRepository;

#[async_trait]
impl SessionRepository for PostgresRecordStore {
    async fn find_session(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT token, username, expires_at FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Session::from))
    }

    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, username, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token)
            DO UPDATE SET
                username = EXCLUDED.username,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&session.token)
        .bind(&session.username)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
