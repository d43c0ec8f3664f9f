//! PostgreSQL repository implementations.
//!
//! Queries are checked at runtime (`sqlx::query_as` and `QueryBuilder`) so the
//! crate builds without a live database.
//!
//! - [`PgLinkRepository`] - Link storage and listing
//! - [`PgUserRepository`] - Account storage and listing
//! - [`sql`] - Predicate-set rendering shared by both

pub mod pg_link_repository;
pub mod pg_user_repository;
pub mod sql;

pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Pool settings read from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Opens a connection pool with the given settings.
pub async fn connect_pool(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
        .connect(database_url)
        .await
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
