use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

fn main() -> Result<()> {
    let db_path = std::env::var("VLR_DB_PATH").unwrap_or_else(|_| "data/vlr.db".to_string());
    let conn = Connection::open(&db_path).with_context(|| format!("open db at {db_path}"))?;

    let tables = ["teams", "tournaments", "matches", "scrape_log"];

    println!("db_path={db_path}");
    for t in tables {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(1) FROM {t}"), [], |r| r.get(0))
            .with_context(|| format!("count {t}"))?;
        println!("{t}: {count}");
    }

    let last_pass: Option<(String, String, String, i64)> = conn
        .query_row(
            "SELECT created_at, url, status, matches_found FROM scrape_log ORDER BY id DESC LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()
        .context("read last scrape entry")?;

    if let Some((ts, url, status, matches_found)) = last_pass {
        println!("last_scrape: ts={ts} url={url} status={status} matches_found={matches_found}");
    } else {
        println!("last_scrape: <none>");
    }

    Ok(())
}
