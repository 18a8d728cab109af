//! Read-only snapshot access to one SQLite store
//!
//! Every `read` opens its own read-only connection on tokio's blocking pool
//! and drops it before returning, on success, error and panic alike. Callers
//! never hold a handle past the closure they pass in.

use super::tables::TableRow;
use crate::sqlite_pragma::apply_read_pragmas;
use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{store} store unreachable: {source}")]
    Connectivity {
        store: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("query on {store}.{table} failed: {source}")]
    Query {
        store: String,
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{store} store read did not complete: {source}")]
    Task {
        store: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl StoreError {
    pub fn store(&self) -> &str {
        match self {
            StoreError::Connectivity { store, .. }
            | StoreError::Query { store, .. }
            | StoreError::Task { store, .. } => store,
        }
    }
}

/// Failures that mean "could not reach the data", as opposed to a bad query
fn is_connectivity(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::SystemIoFailure
                | ErrorCode::PermissionDenied
        ),
        _ => false,
    }
}

/// Handle to one store, created once at startup
#[derive(Debug, Clone)]
pub struct SqliteStore {
    name: String,
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteStore {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>, busy_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
            busy_timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against one read-only session of this store.
    pub async fn read<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&StoreSession) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let session = store.open()?;
            f(&session)
        })
        .await
        .map_err(|source| StoreError::Task {
            store: self.name.clone(),
            source,
        })?
    }

    /// Snapshot a single table.
    pub async fn read_table<T: TableRow>(&self) -> Result<Vec<T>, StoreError> {
        self.read(|session| session.read::<T>()).await
    }

    /// Open a blocking session. The connection closes when the session drops.
    pub fn open(&self) -> Result<StoreSession, StoreError> {
        let connectivity = |source| StoreError::Connectivity {
            store: self.name.clone(),
            source,
        };

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connectivity)?;

        apply_read_pragmas(&conn, self.busy_timeout).map_err(connectivity)?;

        Ok(StoreSession {
            store: self.name.clone(),
            conn,
        })
    }
}

/// One open read-only connection
pub struct StoreSession {
    store: String,
    conn: Connection,
}

impl StoreSession {
    /// Full snapshot of `T::TABLE` in the store's native order
    pub fn read<T: TableRow>(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE);

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| self.error(T::TABLE, e))?;

        let rows = stmt
            .query_map([], |row| T::from_row(row))
            .map_err(|e| self.error(T::TABLE, e))?;

        let mut snapshot = Vec::new();
        for row in rows {
            snapshot.push(row.map_err(|e| self.error(T::TABLE, e))?);
        }

        log::debug!("📥 {}.{}: {} rows", self.store, T::TABLE, snapshot.len());
        Ok(snapshot)
    }

    fn error(&self, table: &str, source: rusqlite::Error) -> StoreError {
        if is_connectivity(&source) {
            StoreError::Connectivity {
                store: self.store.clone(),
                source,
            }
        } else {
            StoreError::Query {
                store: self.store.clone(),
                table: table.to_string(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{create_authors_schema, create_logs_schema};
    use crate::store::tables::{LogEntry, Post, User};
    use rusqlite::params;
    use tempfile::tempdir;

    fn setup_authors_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("authors.db");

        let conn = Connection::open(&db_path).unwrap();
        create_authors_schema(&conn).unwrap();
        for (id, login) in [(3, "carol"), (1, "alice"), (2, "bob")] {
            conn.execute(
                "INSERT INTO users (id, email, login) VALUES (?1, ?2, ?3)",
                params![id, format!("{}@example.com", login), login],
            )
            .unwrap();
        }

        (dir, db_path)
    }

    fn store(path: &Path) -> SqliteStore {
        SqliteStore::new("authors", path, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_read_table_typed() {
        let (_dir, db_path) = setup_authors_db();

        let users: Vec<User> = store(&db_path).read_table().await.unwrap();

        assert_eq!(users.len(), 3);
        let mut logins: Vec<_> = users.iter().map(|u| u.login.as_str()).collect();
        logins.sort_unstable();
        assert_eq!(logins, vec!["alice", "bob", "carol"]);
        assert!(users.iter().all(|u| u.email.ends_with("@example.com")));
    }

    #[tokio::test]
    async fn test_empty_table_is_not_an_error() {
        let (_dir, db_path) = setup_authors_db();

        let posts: Vec<Post> = store(&db_path).read_table().await.unwrap();

        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_one_session_reads_many_tables() {
        let (_dir, db_path) = setup_authors_db();

        let (users, posts) = store(&db_path)
            .read(|session| Ok((session.read::<User>()?, session.read::<Post>()?)))
            .await
            .unwrap();

        assert_eq!(users.len(), 3);
        assert_eq!(posts.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_database_is_connectivity_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope").join("authors.db");

        let err = store(&missing).read_table::<User>().await.unwrap_err();

        assert!(matches!(err, StoreError::Connectivity { .. }), "got {:?}", err);
        assert_eq!(err.store(), "authors");
    }

    #[tokio::test]
    async fn test_missing_table_is_query_error() {
        let (_dir, db_path) = setup_authors_db();

        // authors store has no logs table
        let err = store(&db_path).read_table::<LogEntry>().await.unwrap_err();

        match err {
            StoreError::Query { table, .. } => assert_eq!(table, "logs"),
            other => panic!("expected query error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_schema_drift_is_query_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("logs.db");
        let conn = Connection::open(&db_path).unwrap();
        // logs without target_id
        conn.execute_batch(
            "CREATE TABLE logs (id INTEGER PRIMARY KEY, datetime TEXT, user_id INTEGER,
                                space_type_id INTEGER, event_type_id INTEGER)",
        )
        .unwrap();
        drop(conn);

        let err = SqliteStore::new("logs", &db_path, Duration::from_millis(200))
            .read_table::<LogEntry>()
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Query { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_bad_value_is_query_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("logs.db");
        let conn = Connection::open(&db_path).unwrap();
        create_logs_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO logs (id, datetime, user_id, space_type_id, event_type_id, target_id)
             VALUES (1, 'not a timestamp', 1, 0, 0, NULL)",
            [],
        )
        .unwrap();
        drop(conn);

        let err = SqliteStore::new("logs", &db_path, Duration::from_millis(200))
            .read_table::<LogEntry>()
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Query { .. }), "got {:?}", err);
    }

    #[test]
    fn test_session_is_read_only() {
        let (_dir, db_path) = setup_authors_db();

        let session = store(&db_path).open().unwrap();
        let result = session.conn.execute(
            "INSERT INTO users (id, email, login) VALUES (9, 'x', 'x')",
            [],
        );

        assert!(result.is_err());
    }
}
