//! Seed Stores - fill both SQLite stores with synthetic fixtures
//!
//! Usage:
//!   cargo run --bin seed_stores -- [--seed <u64>] [--reset]
//!
//! `--seed` makes the fixtures reproducible. `--reset` deletes existing rows
//! first (otherwise a second run fails on duplicate ids).
//!
//! Environment variables:
//!   AUTHORS_DB_PATH - authors store, required
//!   LOGS_DB_PATH - logs store, required

use activity_reports::config::ReportsConfig;
use activity_reports::sqlite_pragma::apply_write_pragmas;
use activity_reports::store::schema::{create_authors_schema, create_logs_schema};
use activity_reports::store::seed::{clear, seed, SeedPlan};
use dotenv::dotenv;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::env;
use std::path::Path;

fn parse_seed_from_args(args: &[String]) -> Result<Option<u64>, String> {
    match args.iter().position(|x| x == "--seed") {
        Some(idx) => match args.get(idx + 1).map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => Ok(Some(seed)),
            _ => Err("--seed expects an unsigned integer".to_string()),
        },
        None => Ok(None),
    }
}

fn open_for_seeding(path: &Path) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    apply_write_pragmas(&conn)?;
    Ok(conn)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let seed_value = parse_seed_from_args(&args)?;
    let reset = args.iter().any(|x| x == "--reset");

    let config = ReportsConfig::from_env()?;

    info!("🌱 Seeding stores");
    info!("   ├─ Authors store: {}", config.authors_db_path.display());
    info!("   ├─ Logs store: {}", config.logs_db_path.display());
    match seed_value {
        Some(value) => info!("   └─ Seed: {}", value),
        None => info!("   └─ Seed: random"),
    }

    let mut authors = open_for_seeding(&config.authors_db_path)?;
    let mut logs = open_for_seeding(&config.logs_db_path)?;
    create_authors_schema(&authors)?;
    create_logs_schema(&logs)?;

    if reset {
        clear(&authors, &logs)?;
        info!("🧹 Existing rows deleted");
    }

    let mut rng = match seed_value {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    };
    let summary = seed(&mut authors, &mut logs, &SeedPlan::default(), &mut rng)?;

    info!("✅ Done: {} logs across {} users", summary.logs, summary.users);
    Ok(())
}
