//! Synthetic fixtures for both stores
//!
//! Log rows follow the canonical code table: global-space rows are
//! login/logout with no target, post-space rows are create/delete_post on
//! posts 0..=5, comment-space rows are comments on posts 0..=N (the last id
//! has no post and is dropped by the reports' joins).

use super::tables::{Blog, LogEntry, Post, User};
use crate::report_core::classifier::{SemanticEvent, SpaceKind, SPACE_CODES};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{params, Connection};

const ADJECTIVES: &[&str] = &[
    "quiet", "brave", "lucky", "rapid", "silver", "amber", "gentle", "wild", "clever", "sunny",
];
const NOUNS: &[&str] = &[
    "otter", "falcon", "maple", "river", "comet", "badger", "harbor", "cedar", "willow", "ember",
];
const DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];
const WORDS: &[&str] = &[
    "system", "notes", "weekly", "design", "review", "garden", "travel", "summary", "recipe",
    "update", "thoughts", "release", "guide", "morning", "project", "story", "field", "data",
];
const COMPANY_SUFFIXES: &[&str] = &["Labs", "Group", "Collective", "Works", "Studio"];

/// How much synthetic data to generate
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub users: usize,
    pub blogs: usize,
    pub posts: usize,
    pub logs: usize,
    /// Logs are dated uniformly inside this calendar year
    pub year: i32,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            users: 10,
            blogs: 5,
            posts: 20,
            logs: 250,
            year: 2025,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub blogs: usize,
    pub posts: usize,
    pub logs: usize,
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sentence<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(3..=6);
    let words: Vec<&str> = (0..len).map(|_| pick(rng, WORDS)).collect();
    format!("{}.", capitalize(&words.join(" ")))
}

fn paragraph<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(2..=4);
    (0..len).map(|_| sentence(rng)).collect::<Vec<_>>().join(" ")
}

pub fn generate_users<R: Rng>(plan: &SeedPlan, rng: &mut R) -> Vec<User> {
    (0..plan.users as i64)
        .map(|id| {
            let login = format!(
                "{}_{}{}",
                pick(rng, ADJECTIVES),
                pick(rng, NOUNS),
                rng.gen_range(10..100)
            );
            User {
                id,
                email: format!("{}@{}", login, pick(rng, DOMAINS)),
                login,
            }
        })
        .collect()
}

pub fn generate_blogs<R: Rng>(plan: &SeedPlan, rng: &mut R) -> Vec<Blog> {
    (0..plan.blogs as i64)
        .map(|id| Blog {
            id,
            owner_id: rng.gen_range(0..plan.users.max(1) as i64),
            name: format!("{} {}", capitalize(pick(rng, NOUNS)), pick(rng, COMPANY_SUFFIXES)),
            description: paragraph(rng),
        })
        .collect()
}

pub fn generate_posts<R: Rng>(plan: &SeedPlan, rng: &mut R) -> Vec<Post> {
    (0..plan.posts as i64)
        .map(|id| Post {
            id,
            header: sentence(rng),
            text: paragraph(rng),
            author_id: rng.gen_range(0..plan.users.max(1) as i64),
            blog_id: rng.gen_range(0..plan.blogs.max(1) as i64),
        })
        .collect()
}

pub fn generate_logs<R: Rng>(plan: &SeedPlan, rng: &mut R) -> Vec<LogEntry> {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(plan.year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let end: NaiveDateTime = NaiveDate::from_ymd_opt(plan.year, 12, 31)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let span_secs = (end - start).num_seconds().max(1);

    (0..plan.logs as i64)
        .map(|id| {
            let (space_code, space) = SPACE_CODES[rng.gen_range(0..SPACE_CODES.len())];
            let (event, target_id) = match space {
                SpaceKind::Global => (
                    *[SemanticEvent::Login, SemanticEvent::Logout]
                        .choose(rng)
                        .unwrap_or(&SemanticEvent::Login),
                    None,
                ),
                SpaceKind::Post => (
                    *[SemanticEvent::CreatePost, SemanticEvent::DeletePost]
                        .choose(rng)
                        .unwrap_or(&SemanticEvent::CreatePost),
                    Some(rng.gen_range(0..=5)),
                ),
                SpaceKind::Comment => (
                    SemanticEvent::Comment,
                    Some(rng.gen_range(0..=plan.posts as i64)),
                ),
            };

            LogEntry {
                id,
                timestamp: start + Duration::seconds(rng.gen_range(0..span_secs)),
                user_id: rng.gen_range(0..plan.users.max(1) as i64),
                space_type_id: space_code,
                event_type_id: event.code().unwrap_or_default(),
                target_id,
            }
        })
        .collect()
}

/// Insert users, blogs and posts into the authors store
pub fn insert_authors(
    conn: &mut Connection,
    users: &[User],
    blogs: &[Blog],
    posts: &[Post],
) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO users (id, email, login) VALUES (?1, ?2, ?3)")?;
        for user in users {
            stmt.execute(params![user.id, user.email, user.login])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO blog (id, owner_id, name, description) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for blog in blogs {
            stmt.execute(params![blog.id, blog.owner_id, blog.name, blog.description])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO post (id, header, text, author_id, blog_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for post in posts {
            stmt.execute(params![post.id, post.header, post.text, post.author_id, post.blog_id])?;
        }
    }
    tx.commit()
}

/// Insert log rows into the logs store
pub fn insert_logs(conn: &mut Connection, logs: &[LogEntry]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO logs (id, datetime, user_id, space_type_id, event_type_id, target_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for entry in logs {
            stmt.execute(params![
                entry.id,
                entry.timestamp,
                entry.user_id,
                entry.space_type_id,
                entry.event_type_id,
                entry.target_id,
            ])?;
        }
    }
    tx.commit()
}

/// Delete every fixture row from both stores (lookup tables are kept)
pub fn clear(authors: &Connection, logs: &Connection) -> rusqlite::Result<()> {
    authors.execute_batch("DELETE FROM post; DELETE FROM blog; DELETE FROM users;")?;
    logs.execute_batch("DELETE FROM logs;")?;
    Ok(())
}

/// Generate and insert a full fixture set into both stores.
///
/// Both connections must already carry their schemas.
pub fn seed<R: Rng>(
    authors: &mut Connection,
    logs: &mut Connection,
    plan: &SeedPlan,
    rng: &mut R,
) -> rusqlite::Result<SeedSummary> {
    let users = generate_users(plan, rng);
    let blogs = generate_blogs(plan, rng);
    let posts = generate_posts(plan, rng);
    let entries = generate_logs(plan, rng);

    insert_authors(authors, &users, &blogs, &posts)?;
    insert_logs(logs, &entries)?;

    let summary = SeedSummary {
        users: users.len(),
        blogs: blogs.len(),
        posts: posts.len(),
        logs: entries.len(),
    };
    log::info!(
        "🌱 Seeded {} users, {} blogs, {} posts, {} logs",
        summary.users,
        summary.blogs,
        summary.posts,
        summary.logs
    );
    Ok(summary)
}
