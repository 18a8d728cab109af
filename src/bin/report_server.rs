//! Report Server - comment attribution and daily activity over HTTP
//!
//! Usage:
//!   cargo run --release --bin report_server
//!
//! Environment variables:
//!   AUTHORS_DB_PATH - authors store (users, post, blog), required
//!   LOGS_DB_PATH - logs store (logs, space_type, event_type), required
//!   REPORTS_LISTEN_ADDR - bind address (default: 127.0.0.1:8000)
//!   STORE_BUSY_TIMEOUT_MS - wait on a locked store (default: 5000)
//!   REQUEST_TIMEOUT_MS - bound for one report request (default: 30000)
//!   RUST_LOG - logging level (default: info)

use activity_reports::config::ReportsConfig;
use activity_reports::http::{create_router, AppState};
use activity_reports::report_core::ReportService;
use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("");
            info!("⚠️  Received CTRL+C, shutting down...");
        }
        Err(err) => {
            error!("❌ Failed to listen for CTRL+C: {}", err);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ReportsConfig::from_env()?;

    info!("🚀 Starting Report Server");
    info!("   ├─ Authors store: {}", config.authors_db_path.display());
    info!("   ├─ Logs store: {}", config.logs_db_path.display());
    info!("   ├─ Busy timeout: {:?}", config.store_busy_timeout);
    info!("   └─ Request timeout: {:?}", config.request_timeout);

    let service = ReportService::from_config(&config);
    let state = Arc::new(AppState::new(service, config.request_timeout));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("✅ Listening on http://{}", listener.local_addr()?);
    info!("🔄 Press CTRL+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ Report server stopped");
    Ok(())
}
