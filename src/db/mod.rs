//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for groups, discussions and switch requests.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discussion_groups (
            id TEXT PRIMARY KEY,
            round_id TEXT NOT NULL,
            group_name TEXT,
            participants TEXT,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discussions (
            id TEXT PRIMARY KEY,
            group_id TEXT NOT NULL,
            unit_number INTEGER,
            starts_at INTEGER NOT NULL,
            ends_at INTEGER NOT NULL,
            attendees TEXT,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS switch_requests (
            id TEXT PRIMARY KEY,
            round_id TEXT NOT NULL,
            participant_id TEXT NOT NULL,
            from_group_id TEXT,
            to_group_id TEXT NOT NULL,
            to_discussion_id TEXT,
            note TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_groups_round_id ON discussion_groups(round_id);
        CREATE INDEX IF NOT EXISTS idx_discussions_group_id ON discussions(group_id);
        CREATE INDEX IF NOT EXISTS idx_discussions_unit_number ON discussions(unit_number);
        CREATE INDEX IF NOT EXISTS idx_switch_requests_round_id ON switch_requests(round_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
