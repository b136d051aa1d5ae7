use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub flag_url: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A match row as persisted. Team/tournament references are nullable:
/// a side can be TBD and some events never resolve to a tournament.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMatch {
    pub id: i64,
    pub vlr_match_id: String,
    pub team1_id: Option<i64>,
    pub team2_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub status: String,
    pub match_time: Option<DateTime<Utc>>,
    pub match_format: String,
    pub stage: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub match_url: Option<String>,
    pub vod_url: Option<String>,
    pub stats_url: Option<String>,
    /// JSON per-map breakdown, written only by detail enrichment.
    pub maps_data: Option<String>,
    /// Reserved JSON payload, empty object once enrichment ran.
    pub player_stats: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing-level view of one match, as handed over by the scraper.
/// Names here are raw source strings; the store resolves them to
/// entity ids (or NULL for placeholders) on first insert.
#[derive(Debug, Clone)]
pub struct MatchUpsert {
    pub vlr_match_id: String,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub tournament_name: String,
    pub status: String,
    pub match_time: Option<DateTime<Utc>>,
    pub match_format: String,
    pub stage: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub match_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// One append-only audit row per scrape pass over one listing view
/// (or one detail fetch).
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeLogEntry {
    pub id: i64,
    pub scrape_type: String,
    pub url: String,
    pub status: String,
    pub error_message: Option<String>,
    pub matches_found: i64,
    pub created_at: DateTime<Utc>,
}
