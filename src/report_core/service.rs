//! The two report pipelines
//!
//! Both reports fetch their snapshots concurrently (one read-only session per
//! store), then run join → filter → aggregate → filter synchronously. No state
//! survives between calls.

use super::aggregator::{Aggregator, Counter, Group, Predicate};
use super::classifier::{SemanticEvent, SpaceKind};
use super::filter::{AllZeroFilter, IdentityFilter, PredicateFilter};
use super::joiner::RelationalJoiner;
use super::record::{Record, Value};
use crate::config::ReportsConfig;
use crate::store::tables::{to_records, LogEntry, Post, User};
use crate::store::{SqliteStore, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{report} report: aggregated group has no usable '{field}'")]
    MalformedGroup {
        report: &'static str,
        field: &'static str,
    },
}

/// Comments left by one user, per post and post author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReportRow {
    pub login_commentator: String,
    pub header: String,
    pub login_author: String,
    pub count_comments: u64,
}

/// Daily activity of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReportRow {
    pub date: NaiveDate,
    pub login: String,
    pub count_login: u64,
    pub count_logout: u64,
    pub count_actions_blog: u64,
}

const COMMENT_REPORT: &str = "comment-attribution";
const ACTIVITY_REPORT: &str = "general-activity";

fn group_text(group: &Group, report: &'static str, field: &'static str) -> Result<String, ReportError> {
    group
        .key_value(field)
        .and_then(Value::as_text)
        .map(str::to_string)
        .ok_or(ReportError::MalformedGroup { report, field })
}

fn group_count(group: &Group, report: &'static str, field: &'static str) -> Result<u64, ReportError> {
    group
        .count(field)
        .ok_or(ReportError::MalformedGroup { report, field })
}

impl TryFrom<&Group> for CommentReportRow {
    type Error = ReportError;

    fn try_from(group: &Group) -> Result<Self, Self::Error> {
        Ok(Self {
            login_commentator: group_text(group, COMMENT_REPORT, "login_commentator")?,
            header: group_text(group, COMMENT_REPORT, "header")?,
            login_author: group_text(group, COMMENT_REPORT, "login_author")?,
            count_comments: group_count(group, COMMENT_REPORT, "count_comments")?,
        })
    }
}

impl TryFrom<&Group> for ActivityReportRow {
    type Error = ReportError;

    fn try_from(group: &Group) -> Result<Self, Self::Error> {
        let date = group
            .key_value("date")
            .and_then(Value::as_date)
            .ok_or(ReportError::MalformedGroup {
                report: ACTIVITY_REPORT,
                field: "date",
            })?;

        Ok(Self {
            date,
            login: group_text(group, ACTIVITY_REPORT, "login")?,
            count_login: group_count(group, ACTIVITY_REPORT, "count_login")?,
            count_logout: group_count(group, ACTIVITY_REPORT, "count_logout")?,
            count_actions_blog: group_count(group, ACTIVITY_REPORT, "count_actions_blog")?,
        })
    }
}

/// Comment-attribution pipeline over in-memory snapshots
pub fn comment_attribution(
    logs: &[LogEntry],
    posts: &[Post],
    users: &[User],
    login: &str,
) -> Result<Vec<CommentReportRow>, ReportError> {
    let logs = to_records(logs);
    let posts = to_records(posts);
    let users = to_records(users);

    // Commentator identity
    let with_commentator = RelationalJoiner::on("user_id", "id")
        .with_suffixes("_logs", "_users")
        .join(&logs, &users);

    // target_id is a post id for comment rows
    let with_posts = RelationalJoiner::on("target_id", "id").join(&with_commentator, &posts);

    let comments = PredicateFilter::new(Predicate::Event(SemanticEvent::Comment)).apply(with_posts);

    // Post author identity, side by side with the commentator
    let with_authors = RelationalJoiner::on("author_id", "id")
        .with_suffixes("_commentator", "_author")
        .join(&comments, &users);

    let own = IdentityFilter::new("login_commentator", login).apply(with_authors);

    Aggregator::new(
        ["login_commentator", "header", "login_author"],
        vec![Counter::size("count_comments")],
    )
    .aggregate(&own)
    .iter()
    .map(CommentReportRow::try_from)
    .collect()
}

/// General-activity pipeline over in-memory snapshots
pub fn general_activity(
    logs: &[LogEntry],
    users: &[User],
    login: &str,
) -> Result<Vec<ActivityReportRow>, ReportError> {
    let logs = to_records(logs);
    let users = to_records(users);

    let joined = RelationalJoiner::on("user_id", "id")
        .with_suffixes("_logs", "_user")
        .join(&logs, &users);

    let dated: Vec<Record> = joined.into_iter().map(with_calendar_date).collect();

    let aggregator = Aggregator::new(
        ["date", "login"],
        vec![
            Counter::new("count_login", Predicate::Event(SemanticEvent::Login)),
            Counter::new("count_logout", Predicate::Event(SemanticEvent::Logout)),
            Counter::new("count_actions_blog", Predicate::Space(SpaceKind::Post)),
        ],
    );
    let groups = aggregator.aggregate(&dated);

    let active = AllZeroFilter::new(aggregator.counter_names()).apply(groups);
    let own = IdentityFilter::new("login", login).apply(active);

    own.iter().map(ActivityReportRow::try_from).collect()
}

/// Add a `date` field holding the calendar day of `datetime`
fn with_calendar_date(mut record: Record) -> Record {
    if let Some(ts) = record.get("datetime").and_then(Value::as_datetime) {
        record.insert("date", ts.date());
    }
    record
}

/// Holds one handle per store and runs both reports
#[derive(Debug, Clone)]
pub struct ReportService {
    authors: SqliteStore,
    logs: SqliteStore,
}

impl ReportService {
    pub fn new(authors: SqliteStore, logs: SqliteStore) -> Self {
        Self { authors, logs }
    }

    pub fn from_config(config: &ReportsConfig) -> Self {
        Self::new(
            SqliteStore::new("authors", &config.authors_db_path, config.store_busy_timeout),
            SqliteStore::new("logs", &config.logs_db_path, config.store_busy_timeout),
        )
    }

    pub fn authors(&self) -> &SqliteStore {
        &self.authors
    }

    pub fn logs(&self) -> &SqliteStore {
        &self.logs
    }

    /// Comments left by `login`, per (post header, post author)
    pub async fn comment_report(&self, login: &str) -> Result<Vec<CommentReportRow>, ReportError> {
        let (logs, (posts, users)) = tokio::try_join!(
            self.logs.read_table::<LogEntry>(),
            self.authors
                .read(|session| Ok((session.read::<Post>()?, session.read::<User>()?))),
        )?;

        let rows = comment_attribution(&logs, &posts, &users, login)?;
        log::info!(
            "💬 comment report login={} logs={} posts={} users={} -> {} rows",
            login,
            logs.len(),
            posts.len(),
            users.len(),
            rows.len()
        );
        Ok(rows)
    }

    /// Per-day login/logout/blog activity of `login`
    pub async fn activity_report(&self, login: &str) -> Result<Vec<ActivityReportRow>, ReportError> {
        let (logs, users) = tokio::try_join!(
            self.logs.read_table::<LogEntry>(),
            self.authors.read_table::<User>(),
        )?;

        let rows = general_activity(&logs, &users, login)?;
        log::info!(
            "📊 activity report login={} logs={} users={} -> {} rows",
            login,
            logs.len(),
            users.len(),
            rows.len()
        );
        Ok(rows)
    }
}
