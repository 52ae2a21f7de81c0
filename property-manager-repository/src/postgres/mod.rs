//! PostgreSQL implementation of the record store.
//!
//! All reads are built with `sqlx::QueryBuilder` so the filter criteria can be
//! translated clause by clause; every value is bound, and only whitelisted
//! column names and sort directions are spliced into the SQL text.
//!
//! ## Database Tables
//!
//! - `owners`, `units`, `tenants`: the property registry
//! - `contracts`, `contract_tenants`: leases and their tenants
//! - `payment_types`, `payments`: the ledger
//! - `incidents`, `documents`: per-unit records
//! - `sessions`: authenticated sessions
//!
//! Referential rules live in the schema (`migrations/`): owners and units
//! cascade, tenants protect their unit, payment types are protected by their
//! payments, and deleting a contract unlinks its payments.

mod contracts;
mod documents;
mod filters;
mod incidents;
mod owners;
mod payment_types;
mod payments;
mod rows;
mod sessions;
mod tenants;
mod units;

use property_manager_shared::{Page, PageRequest};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::info;

use crate::errors::RepositoryError;

/// PostgreSQL record store backed by a connection pool.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Wraps an existing pool whose database already has the schema.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("src/postgres/migrations")
            .run(&self.pool)
            .await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Opens a read-only transaction in which every statement sees the same
    /// snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// [`fetch_page_on`] inside its own snapshot, so the count and the rows agree.
    async fn fetch_page<R, T, F>(
        &self,
        count: QueryBuilder<'_, Postgres>,
        select: QueryBuilder<'_, Postgres>,
        page: PageRequest,
        convert: F,
    ) -> Result<Page<T>, RepositoryError>
    where
        R: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
        F: Fn(R) -> Result<T, RepositoryError>,
    {
        let mut tx = self.begin_snapshot().await?;
        let page = fetch_page_on(&mut tx, count, select, page, convert).await?;
        tx.commit().await?;
        Ok(page)
    }
}

/// Runs `count` to size the result, clamps the requested page, then runs
/// `select` with the matching `LIMIT`/`OFFSET` appended.
///
/// Both builders must carry the same `FROM ... WHERE ...` clauses, and
/// `select` must already end with its `ORDER BY`.
async fn fetch_page_on<R, T, F>(
    conn: &mut PgConnection,
    mut count: QueryBuilder<'_, Postgres>,
    mut select: QueryBuilder<'_, Postgres>,
    page: PageRequest,
    convert: F,
) -> Result<Page<T>, RepositoryError>
where
    R: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    F: Fn(R) -> Result<T, RepositoryError>,
{
    let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;
    let total = total.max(0) as u64;
    let request = page.clamp_to(total);

    select
        .push(" LIMIT ")
        .push_bind(request.size as i64)
        .push(" OFFSET ")
        .push_bind(request.offset() as i64);
    let rows: Vec<R> = select.build_query_as().fetch_all(&mut *conn).await?;
    let items = rows
        .into_iter()
        .map(convert)
        .collect::<Result<Vec<T>, RepositoryError>>()?;
    Ok(Page::new(items, request, total))
}
