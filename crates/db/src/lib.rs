//! Persistence for Creative Studio designs and client-portal grants.
//!
//! - [`models`]: `FromRow` row structs for the PostgreSQL tables.
//! - [`repositories`]: zero-sized repositories with async SQL methods that
//!   take `&PgPool` as their first argument.
//! - [`store`]: the [`DesignStore`] and [`PortalTokenStore`] traits the API
//!   is built against, with PostgreSQL and in-memory implementations.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::memory::{InMemoryDesignStore, InMemoryPortalTokenStore};
pub use store::postgres::{PgDesignStore, PgPortalTokenStore};
pub use store::{DesignStore, PortalTokenStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
