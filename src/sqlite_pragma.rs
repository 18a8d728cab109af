//! Connection PRAGMAs shared by the report readers and the seeding tool.

use rusqlite::Connection;
use std::time::Duration;

/// Apply read-side settings to a report connection.
///
/// `busy_timeout` bounds how long a read waits on a locked database before
/// failing with `SQLITE_BUSY`. `query_only` must come last.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -16_000)?;
    conn.pragma_update(None, "query_only", "ON")?;
    Ok(())
}

/// Apply write-side settings used while seeding a store.
///
/// Stays on the rollback journal: report readers open the files with
/// `SQLITE_OPEN_READ_ONLY`, which cannot always attach a WAL index.
pub fn apply_write_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    Ok(())
}
