//! vlr.gg match scraper
//!
//! Listing pages: https://www.vlr.gg/matches (upcoming) and
//! https://www.vlr.gg/matches/results
//!
//! One listing row:
//! <a class="match-item" href="/353177/sentinels-vs-fnatic-...">
//!   <div class="match-item-time">2h 30m | LIVE | 6:00 PM</div>
//!   <div class="match-item-vs-team-name">Sentinels</div> (×2)
//!   <div class="match-item-vs-team-score">13</div> (×2)
//!   <div class="match-item-event">Champions Tour ...</div>
//!   <div class="match-item-event-series">Group Stage</div>
//! </a>
//!
//! Match pages render one <div class="vm-stats-game"> per played map.

pub mod client;
pub mod detail;
pub mod listing;
pub mod time_parse;

pub use client::{FetchError, PageClient};
pub use detail::{parse_match_detail, MapRecord};
pub use listing::{parse_listing, ListingMatch, MatchStatus};
pub use time_parse::parse_time_label;

pub const DEFAULT_BASE_URL: &str = "https://www.vlr.gg";

/// Best-effort score coercion: vlr leaves dashes or placeholder glyphs
/// in the score cells of unplayed matches, which must read as 0.
pub(crate) fn digit_score(text: &str) -> u32 {
    let text = text.trim();
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().unwrap_or(0)
    } else {
        0
    }
}
