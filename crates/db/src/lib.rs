//! PostgreSQL persistence gateway.
//!
//! Provides pool setup, migrations, row models, and the `sqlx`-backed
//! implementations of the core store traits.

pub mod error;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub use repositories::{PgSkiLiftStore, PgSportStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
