//! Shared fixtures: two on-disk SQLite stores in a temp directory

#![allow(dead_code)]

use activity_reports::report_core::{ReportService, SemanticEvent};
use activity_reports::store::schema::{create_authors_schema, create_logs_schema};
use activity_reports::store::SqliteStore;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub struct Stores {
    pub dir: TempDir,
    pub authors_path: PathBuf,
    pub logs_path: PathBuf,
    authors: Connection,
    logs: Connection,
    next_log_id: i64,
}

impl Stores {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let authors_path = dir.path().join("authors.db");
        let logs_path = dir.path().join("logs.db");

        let authors = Connection::open(&authors_path).unwrap();
        let logs = Connection::open(&logs_path).unwrap();
        create_authors_schema(&authors).unwrap();
        create_logs_schema(&logs).unwrap();

        Self {
            dir,
            authors_path,
            logs_path,
            authors,
            logs,
            next_log_id: 1,
        }
    }

    pub fn user(&self, id: i64, login: &str) -> &Self {
        self.authors
            .execute(
                "INSERT INTO users (id, email, login) VALUES (?1, ?2, ?3)",
                params![id, format!("{}@example.com", login), login],
            )
            .unwrap();
        self
    }

    pub fn post(&self, id: i64, header: &str, author_id: i64) -> &Self {
        self.authors
            .execute(
                "INSERT INTO post (id, header, text, author_id, blog_id) VALUES (?1, ?2, '', ?3, 0)",
                params![id, header, author_id],
            )
            .unwrap();
        self
    }

    /// Insert a log row with the codes of `event`
    pub fn event(&mut self, user_id: i64, at: NaiveDateTime, event: SemanticEvent, target_id: Option<i64>) {
        let space = event.space().map(|s| s.code()).unwrap();
        let code = event.code().unwrap();
        self.raw_log(user_id, at, space, code, target_id);
    }

    /// Insert a log row with arbitrary codes
    pub fn raw_log(&mut self, user_id: i64, at: NaiveDateTime, space: i64, code: i64, target_id: Option<i64>) {
        self.logs
            .execute(
                "INSERT INTO logs (id, datetime, user_id, space_type_id, event_type_id, target_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![self.next_log_id, at, user_id, space, code, target_id],
            )
            .unwrap();
        self.next_log_id += 1;
    }

    pub fn service(&self) -> ReportService {
        ReportService::new(
            SqliteStore::new("authors", &self.authors_path, Duration::from_millis(500)),
            SqliteStore::new("logs", &self.logs_path, Duration::from_millis(500)),
        )
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}
