//! scrape-now — one-shot synchronous scrape pass
//!
//! Run:
//!   cargo run --bin scrape-now

use anyhow::Result;
use dotenv::dotenv;
use tracing::info;
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

    let mut runner = ScrapeRunner::from_env()?;
    let count = runner.run_scrape_pass().await?;

    info!("scraped {count} matches");
    println!("{count}");
    Ok(())
}
