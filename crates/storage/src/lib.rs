//! Storage layer: SQLite pool setup and the migration runner.
//!
//! The schema (emotions, movies, movie_emotions) lives in
//! `crates/storage/migrations` and is applied with [`migrate`].

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

/// Turns a plain filesystem path into a `sqlite:` URL. URLs are passed through.
pub fn database_url(database: &str) -> String {
    if database.starts_with("sqlite:") {
        return database.to_string();
    }
    let path = std::path::PathBuf::from(database);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let norm = path.to_string_lossy().replace('\\', "/");
    if path.is_absolute() {
        format!("sqlite:///{}", norm.trim_start_matches('/'))
    } else {
        format!("sqlite://{}", norm)
    }
}

/// `sqlite::memory:` or a `mode=memory` URI; a file merely named "memory" is not.
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub async fn connect(database: &str) -> anyhow::Result<SqlitePool> {
    let url = database_url(database);
    let options = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("invalid database url: {url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database only lives as long as its connection.
    let max_connections = if is_in_memory(&url) { 1 } else { 5 };
    debug!(%url, max_connections, "opening sqlite pool");

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("connect {url}"))?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Safe to run multiple times.
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Connects and brings the schema up to date.
pub async fn open(database: &str) -> anyhow::Result<SqlitePool> {
    let pool = connect(database).await?;
    migrate(&pool).await.context("db migrate")?;
    Ok(pool)
}
