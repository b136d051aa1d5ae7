//! Drives the parse → resolve → upsert pipeline over a fixture listing
//! page, twice, and checks that a re-scrape merges instead of
//! duplicating.

use chrono::Utc;
use match_store::{MatchStore, MatchUpsert, UpsertOutcome};
use vlr_scraper::{parse_listing, ListingMatch};

const LISTING_PAGE: &str = r#"
<div class="col-container">
  <a class="match-item" href="/353177/sentinels-vs-fnatic-champions-2025/">
    <div class="match-item-time">2h 30m</div>
    <div class="match-item-vs-team-name">Sentinels</div>
    <div class="match-item-vs-team-name">Fnatic</div>
    <div class="match-item-vs-team-score">–</div>
    <div class="match-item-vs-team-score">–</div>
    <div class="match-item-event">Valorant Champions 2025</div>
    <div class="match-item-event-series">Playoffs</div>
  </a>
  <a class="match-item" href="/353178/drx-vs-sentinels-champions-2025/">
    <div class="match-item-time">LIVE</div>
    <div class="match-item-vs-team-name">DRX</div>
    <div class="match-item-vs-team-name">Sentinels</div>
    <div class="match-item-vs-team-score">1</div>
    <div class="match-item-vs-team-score">0</div>
    <div class="match-item-event">Valorant Champions 2025</div>
  </a>
  <a class="match-item" href="/353179/tbd-vs-tbd/">
    <div class="match-item-time">1d 4h</div>
    <div class="match-item-vs-team-name">TBD</div>
    <div class="match-item-vs-team-name">TBD</div>
    <div class="match-item-vs-team-score">–</div>
    <div class="match-item-vs-team-score">–</div>
  </a>
  <a class="match-item" href="/matches/results">decoration</a>
</div>
"#;

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

#[test]
fn rescrape_is_idempotent() {
    let store = MatchStore::open_in_memory().unwrap();
    let base = "https://www.vlr.gg";

    let records = parse_listing(LISTING_PAGE, base, Utc::now());
    assert_eq!(records.len(), 3);

    for rec in &records {
        let outcome = store.upsert_match(&to_upsert(rec)).unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
    }

    // Second pass over the same page: every match merges, nothing new
    let records = parse_listing(LISTING_PAGE, base, Utc::now());
    for rec in &records {
        let outcome = store.upsert_match(&to_upsert(rec)).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
    }

    assert_eq!(store.list_matches(None).unwrap().len(), 3);

    // "Sentinels" appears in two matches, "TBD" in one; only three real
    // team rows exist and the TBD sides stayed NULL
    let teams = store.list_teams().unwrap();
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["DRX", "Fnatic", "Sentinels"]);

    let tbd_match = store.match_by_vlr_id("353179").unwrap().unwrap();
    assert!(tbd_match.team1_id.is_none());
    assert!(tbd_match.team2_id.is_none());
    // Missing event element falls back to the sentinel tournament name,
    // which is a real entity
    let tournaments = store.list_tournaments().unwrap();
    let names: Vec<&str> = tournaments.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Unknown Tournament", "Valorant Champions 2025"]);
}

#[test]
fn score_progression_across_passes() {
    let store = MatchStore::open_in_memory().unwrap();
    let base = "https://www.vlr.gg";

    let records = parse_listing(LISTING_PAGE, base, Utc::now());
    for rec in &records {
        store.upsert_match(&to_upsert(rec)).unwrap();
    }

    // The live match finishes; the next pass sees final scores
    let finished = LISTING_PAGE
        .replace(
            r#"<div class="match-item-time">LIVE</div>"#,
            r#"<div class="match-item-time">Completed</div>"#,
        )
        .replace(
            r#"<div class="match-item-vs-team-score">1</div>"#,
            r#"<div class="match-item-vs-team-score">2</div>"#,
        );
    let records = parse_listing(&finished, base, Utc::now());
    for rec in &records {
        store.upsert_match(&to_upsert(rec)).unwrap();
    }

    let m = store.match_by_vlr_id("353178").unwrap().unwrap();
    assert_eq!(m.status, "completed");
    assert_eq!((m.team1_score, m.team2_score), (2, 0));
}
