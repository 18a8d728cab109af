//! Typed rows for every table the two stores expose

use crate::report_core::record::Record;
use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::Serialize;

/// A table row decoded straight from a store query
pub trait TableRow: Sized + Send + 'static {
    /// Table name in its store
    const TABLE: &'static str;
    /// Columns selected, in order
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Flat column-name form used by the join/aggregate stages
    fn to_record(&self) -> Record;
}

/// Account in the authors store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
}

/// Post in the authors store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub header: String,
    pub text: String,
    pub author_id: i64,
    pub blog_id: i64,
}

/// Blog in the authors store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blog {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
}

/// Event row in the logs store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: i64,
    /// Stored in the `datetime` column
    pub timestamp: NaiveDateTime,
    pub user_id: i64,
    pub space_type_id: i64,
    pub event_type_id: i64,
    /// Post id for post/comment space events, NULL for global ones
    pub target_id: Option<i64>,
}

impl TableRow for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "email", "login"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            login: row.get("login")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("email", self.email.as_str())
            .with("login", self.login.as_str())
    }
}

impl TableRow for Post {
    const TABLE: &'static str = "post";
    const COLUMNS: &'static [&'static str] = &["id", "header", "text", "author_id", "blog_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            header: row.get("header")?,
            text: row.get("text")?,
            author_id: row.get("author_id")?,
            blog_id: row.get("blog_id")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("header", self.header.as_str())
            .with("text", self.text.as_str())
            .with("author_id", self.author_id)
            .with("blog_id", self.blog_id)
    }
}

impl TableRow for Blog {
    const TABLE: &'static str = "blog";
    const COLUMNS: &'static [&'static str] = &["id", "owner_id", "name", "description"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("owner_id", self.owner_id)
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
    }
}

impl TableRow for LogEntry {
    const TABLE: &'static str = "logs";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "datetime",
        "user_id",
        "space_type_id",
        "event_type_id",
        "target_id",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            timestamp: row.get("datetime")?,
            user_id: row.get("user_id")?,
            space_type_id: row.get("space_type_id")?,
            event_type_id: row.get("event_type_id")?,
            target_id: row.get("target_id")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("datetime", self.timestamp)
            .with("user_id", self.user_id)
            .with("space_type_id", self.space_type_id)
            .with("event_type_id", self.event_type_id)
            .with("target_id", self.target_id)
    }
}

/// Convert a typed snapshot into records
pub fn to_records<T: TableRow>(rows: &[T]) -> Vec<Record> {
    rows.iter().map(TableRow::to_record).collect()
}
