//! enrich-detail — fetch the per-map breakdown for stored matches
//!
//! With an id, enriches that one match; without, backfills completed
//! matches that still lack detail data. Best-effort either way.
//!
//! Run:
//!   cargo run --bin enrich-detail -- [vlr_match_id]

use anyhow::Result;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod runner;
use runner::ScrapeRunner;

const BACKFILL_LIMIT: usize = 25;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut runner = ScrapeRunner::from_env()?;

    let ids = match std::env::args().nth(1) {
        Some(id) => vec![id],
        None => {
            let missing = runner.store().matches_missing_detail(BACKFILL_LIMIT)?;
            info!("{} completed matches missing detail data", missing.len());
            missing
        }
    };

    for id in &ids {
        match runner.enrich_match_detail(id).await {
            Some(maps) => info!("match {id}: {} maps written", maps.len()),
            None => warn!("match {id}: no detail written"),
        }
    }

    Ok(())
}
