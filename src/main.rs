//! vlr-observer — periodic vlr.gg scrape loop
//!
//! Every VLR_SCRAPE_INTERVAL_SECS (default 900) runs one full pass over
//! the upcoming and results listings and upserts into the match store.
//! The first pass runs immediately on startup.
//!
//! Run:
//!   cargo run --bin vlr-observer

use std::env;
use std::fs::File;

use anyhow::Result;
use dotenv::dotenv;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod runner;
use runner::ScrapeRunner;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("=== vlr-live observer ===");

    // Single instance lock
    let lock_file_path = env::temp_dir().join("vlr_live_observer.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of vlr-observer is already running! Exiting.");
            return Ok(());
        }
    };

    let interval_secs = env::var("VLR_SCRAPE_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(900);
    info!("Scrape interval: {interval_secs}s");

    let mut runner = ScrapeRunner::from_env()?;

    loop {
        info!("--- scrape pass ---");
        match runner.run_scrape_pass().await {
            Ok(count) => info!("pass complete: {count} matches"),
            Err(e) => warn!("scrape pass failed: {e:#}"),
        }

        sleep(Duration::from_secs(interval_secs)).await;
    }
}
