//! Database schema migrations.
//!
//! Applies the initial schema: the conversations log, the bots catalog,
//! and the schema_migrations bookkeeping table.

use rusqlite::Connection;
use tracing::info;

use chorus_core::error::ChorusError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), ChorusError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| ChorusError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| ChorusError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: conversations + bots.
///
/// `created_at` is stored as epoch milliseconds.
fn apply_v1(conn: &Connection) -> Result<(), ChorusError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS conversations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            input       TEXT NOT NULL,
            bot_id      TEXT NOT NULL,
            response    TEXT NOT NULL,
            created_at  INTEGER NOT NULL
                        DEFAULT (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
        );

        CREATE INDEX IF NOT EXISTS idx_conversations_created_at
            ON conversations (created_at DESC, id DESC);

        CREATE TABLE IF NOT EXISTS bots (
            id              TEXT PRIMARY KEY NOT NULL,
            name            TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            learning_type   TEXT NOT NULL
                            CHECK (learning_type IN ('pattern', 'markov', 'similarity', 'neural', 'simple')),
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| ChorusError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
