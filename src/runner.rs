//! One scrape pass over the vlr.gg listing views, plus on-demand
//! detail enrichment. Shared by the observer loop and the one-shot
//! binaries.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use match_store::{MatchStore, MatchUpsert, UpsertOutcome};
use tracing::{info, warn};
use vlr_scraper::{
    parse_listing, parse_match_detail, ListingMatch, MapRecord, PageClient, DEFAULT_BASE_URL,
};

/// Listing views walked by one pass: upcoming first, then results.
const LISTING_VIEWS: [&str; 2] = ["", "results"];

pub struct ScrapeRunner {
    client: PageClient,
    store: MatchStore,
    base_url: String,
}

impl ScrapeRunner {
    pub fn new(client: PageClient, store: MatchStore, base_url: impl Into<String>) -> Self {
        Self {
            client,
            store,
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("VLR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let db_path = env::var("VLR_DB_PATH").unwrap_or_else(|_| "data/vlr.db".to_string());
        let rate_ms = env::var("VLR_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let store =
            MatchStore::open(&db_path).with_context(|| format!("open store at {db_path}"))?;
        Ok(Self::new(
            PageClient::new(Duration::from_millis(rate_ms)),
            store,
            base_url,
        ))
    }

    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    /// Runs one full pass over all listing views and returns the number
    /// of matches seen. A dead view contributes zero and gets an error
    /// audit row; only a failing audit write (persistence outage)
    /// escalates out of here.
    pub async fn run_scrape_pass(&mut self) -> Result<usize> {
        let mut total = 0;
        for view in LISTING_VIEWS {
            total += self.scrape_listing_view(view).await?;
        }
        info!("scrape pass done: {total} matches across {} views", LISTING_VIEWS.len());
        Ok(total)
    }

    async fn scrape_listing_view(&mut self, view: &str) -> Result<usize> {
        let url = format!("{}/matches/{}", self.base_url, view);
        info!("scraping listing: {url}");

        let html = match self.client.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("listing fetch failed: {e}");
                self.store
                    .append_scrape_log("matches_list", &url, "error", Some(&e.to_string()), 0)
                    .context("append audit entry")?;
                return Ok(0);
            }
        };

        let records = parse_listing(&html, &self.base_url, Utc::now());
        let mut found: usize = 0;
        for rec in &records {
            match self.store.upsert_match(&to_upsert(rec)) {
                Ok(UpsertOutcome::Created) => {
                    found += 1;
                    info!(
                        "new match {}: {} vs {}",
                        rec.vlr_match_id,
                        rec.team1_name.as_deref().unwrap_or("TBD"),
                        rec.team2_name.as_deref().unwrap_or("TBD"),
                    );
                }
                Ok(UpsertOutcome::Updated) => found += 1,
                Err(e) => warn!("upsert failed for match {}: {e}", rec.vlr_match_id),
            }
        }

        self.store
            .append_scrape_log("matches_list", &url, "success", None, found as i64)
            .context("append audit entry")?;
        info!("scraped {found} matches from {url}");
        Ok(found)
    }

    /// Best-effort detail enrichment for one stored match: fetches its
    /// match page and writes the per-map breakdown. Leaves the match
    /// untouched on any failure; nothing escalates past here.
    pub async fn enrich_match_detail(&mut self, vlr_match_id: &str) -> Option<Vec<MapRecord>> {
        let stored = match self.store.match_by_vlr_id(vlr_match_id) {
            Ok(Some(m)) => m,
            Ok(None) => {
                warn!("enrich: no stored match with id {vlr_match_id}");
                return None;
            }
            Err(e) => {
                warn!("enrich: lookup failed for {vlr_match_id}: {e}");
                return None;
            }
        };
        let Some(url) = stored.match_url else {
            warn!("enrich: match {vlr_match_id} has no source url");
            return None;
        };

        let html = match self.client.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("detail fetch failed: {e}");
                let _ = self
                    .store
                    .append_scrape_log("match_detail", &url, "error", Some(&e.to_string()), 0);
                return None;
            }
        };

        let maps = parse_match_detail(&html);
        // Player stats stay a reserved empty payload for now
        match self
            .store
            .update_match_detail(vlr_match_id, &maps, &serde_json::json!({}))
        {
            Ok(true) => {
                let _ = self
                    .store
                    .append_scrape_log("match_detail", &url, "success", None, maps.len() as i64);
                info!("enriched match {vlr_match_id} with {} maps", maps.len());
                Some(maps)
            }
            Ok(false) => None,
            Err(e) => {
                warn!("enrich: detail write failed for {vlr_match_id}: {e}");
                None
            }
        }
    }
}

fn to_upsert(rec: &ListingMatch) -> MatchUpsert {
    MatchUpsert {
        vlr_match_id: rec.vlr_match_id.clone(),
        team1_name: rec.team1_name.clone(),
        team2_name: rec.team2_name.clone(),
        tournament_name: rec.tournament_name.clone(),
        status: rec.status.as_str().to_string(),
        match_time: rec.match_time,
        match_format: rec.match_format.clone(),
        stage: rec.stage.clone(),
        team1_score: rec.team1_score,
        team2_score: rec.team2_score,
        match_url: Some(rec.match_url.clone()),
    }
}
