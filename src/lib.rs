//! Activity reports over two independently hosted SQLite stores.
//!
//! The authors store holds users, posts and blogs. The logs store holds the
//! timestamped event stream. Reports are computed from full point-in-time
//! snapshots of both stores on every request.

pub mod config;
pub mod http;
pub mod report_core;
pub mod sqlite_pragma;
pub mod store;

pub use config::{ConfigError, ReportsConfig};
pub use report_core::{ActivityReportRow, CommentReportRow, ReportError, ReportService};
pub use store::{SqliteStore, StoreError};
