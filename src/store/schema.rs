//! DDL for both stores (idempotent)

use crate::report_core::classifier::{EVENT_CODES, SPACE_CODES};
use rusqlite::{params, Connection};

/// Create `users`, `blog` and `post` in the authors store
pub fn create_authors_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            login TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS blog (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS post (
            id INTEGER PRIMARY KEY,
            header TEXT NOT NULL,
            text TEXT NOT NULL,
            author_id INTEGER NOT NULL,
            blog_id INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_post_author ON post(author_id);",
    )?;

    log::debug!("authors schema ready");
    Ok(())
}

/// Create `space_type`, `event_type` and `logs` in the logs store, and fill
/// the two lookup tables from the canonical code table
pub fn create_logs_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS space_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS event_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS logs (
            id INTEGER PRIMARY KEY,
            datetime TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            space_type_id INTEGER NOT NULL,
            event_type_id INTEGER NOT NULL,
            target_id INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_logs_user ON logs(user_id);",
    )?;

    for (code, space) in SPACE_CODES {
        conn.execute(
            "INSERT OR IGNORE INTO space_type (id, name) VALUES (?1, ?2)",
            params![code, space.as_str()],
        )?;
    }
    for (code, event) in EVENT_CODES {
        conn.execute(
            "INSERT OR IGNORE INTO event_type (id, name) VALUES (?1, ?2)",
            params![code, event.as_str()],
        )?;
    }

    log::debug!("logs schema ready");
    Ok(())
}
