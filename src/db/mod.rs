//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! The durable local store is an embedded SQLite database. Startup uses
//! this module to create the shared SQLx pool and enforce schema
//! migrations before any autosave or backup service is spawned.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

fn db_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Initialize the SQLite connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(db_max_connections())
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory pool for tests. Separate connections to
/// `sqlite::memory:` see separate databases, so the pool is pinned to one.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
