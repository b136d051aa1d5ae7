use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::digit_score;

/// Per-map breakdown scraped from a match page, persisted as the
/// match's JSON detail payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    pub map_name: String,
    pub team1_score: u32,
    pub team2_score: u32,
    /// Agent picks in draft order, both teams interleaved as rendered.
    pub agents: Vec<String>,
}

/// Parses a match page into its per-map breakdown. vlr renders one
/// `.vm-stats-game` block per played map; a page without them (an
/// upcoming match) yields an empty vec, not an error.
pub fn parse_match_detail(html: &str) -> Vec<MapRecord> {
    let document = Html::parse_document(html);
    let map_sel = Selector::parse(".vm-stats-game").unwrap();

    document.select(&map_sel).map(parse_map_section).collect()
}

fn parse_map_section(section: ElementRef<'_>) -> MapRecord {
    let name_sel = Selector::parse(".map").unwrap();
    let score_sel = Selector::parse(".score").unwrap();
    let agent_sel = Selector::parse("img.agent").unwrap();

    let map_name = section
        .select(&name_sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let scores: Vec<u32> = section
        .select(&score_sel)
        .map(|e| digit_score(&e.text().collect::<String>()))
        .collect();
    let team1_score = scores.first().copied().unwrap_or(0);
    let team2_score = scores.get(1).copied().unwrap_or(0);

    let agents = section
        .select(&agent_sel)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(agent_stem)
        .collect();

    MapRecord {
        map_name,
        team1_score,
        team2_score,
        agents,
    }
}

// "/img/vlr/game/agents/jett.png" → "jett"; a src without a path
// separator carries no extractable stem and is skipped.
fn agent_stem(src: &str) -> Option<String> {
    let (_, file) = src.rsplit_once('/')?;
    let stem = file.split('.').next().unwrap_or("");
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
