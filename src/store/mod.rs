//! The two SQLite stores: typed tables, read-only gateway, DDL and fixtures

pub mod gateway;
pub mod schema;
pub mod seed;
pub mod tables;

pub use gateway::{SqliteStore, StoreError, StoreSession};
pub use tables::{Blog, LogEntry, Post, TableRow, User};
