//! SQLite-backed store for scraped match data.
//!
//! Identity rules: teams and tournaments are keyed by exact name,
//! matches by their external vlr id. All three carry UNIQUE columns so
//! concurrent insert attempts on the same key degrade to "one wins,
//! the other observes the existing row" instead of duplicating.

mod models;
mod store;

use thiserror::Error;

pub use models::{
    MatchUpsert, ScrapeLogEntry, StoredMatch, Team, Tournament, UpsertOutcome,
};
pub use store::MatchStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
