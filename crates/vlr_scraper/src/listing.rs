use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::digit_score;
use crate::time_parse::parse_time_label;

// Match ids are the numeric path segment: /353177/sentinels-vs-fnatic-...
static MATCH_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(\d+)/").unwrap());

pub const UNKNOWN_TOURNAMENT: &str = "Unknown Tournament";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }
}

/// Everything a single listing row tells us about a match.
#[derive(Debug, Clone)]
pub struct ListingMatch {
    pub vlr_match_id: String,
    pub match_url: String,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub team1_score: u32,
    pub team2_score: u32,
    pub tournament_name: String,
    pub stage: String,
    pub status: MatchStatus,
    pub match_time: Option<DateTime<Utc>>,
    pub match_format: String,
}

/// Parses one listing page into match records. Anchors without a
/// numeric match id in their href are non-match decoration and are
/// skipped; no single row can take down the rest of the page.
pub fn parse_listing(html: &str, base_url: &str, now: DateTime<Utc>) -> Vec<ListingMatch> {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse("a.match-item").unwrap();

    document
        .select(&container_sel)
        .filter_map(|node| parse_container(node, base_url, now))
        .collect()
}

fn parse_container(
    container: ElementRef<'_>,
    base_url: &str,
    now: DateTime<Utc>,
) -> Option<ListingMatch> {
    let href = container.value().attr("href")?;
    let vlr_match_id = MATCH_ID_RE.captures(href)?.get(1)?.as_str().to_string();
    let match_url = if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    };

    let team_sel = Selector::parse(".match-item-vs-team-name").unwrap();
    let names: Vec<String> = container.select(&team_sel).map(element_text).collect();
    let team1_name = names.first().cloned();
    let team2_name = names.get(1).cloned();

    let score_sel = Selector::parse(".match-item-vs-team-score").unwrap();
    let scores: Vec<String> = container.select(&score_sel).map(element_text).collect();
    let team1_score = scores.first().map(|s| digit_score(s)).unwrap_or(0);
    let team2_score = scores.get(1).map(|s| digit_score(s)).unwrap_or(0);

    let time_sel = Selector::parse(".match-item-time").unwrap();
    let time_text = container
        .select(&time_sel)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let time_lower = time_text.to_lowercase();

    let (status, match_time) = if time_lower.contains("live") {
        (MatchStatus::Live, Some(now))
    } else if team1_score > 0 || team2_score > 0 {
        (MatchStatus::Completed, None)
    } else {
        (MatchStatus::Upcoming, parse_time_label(&time_text, now))
    };

    let event_sel = Selector::parse(".match-item-event").unwrap();
    let tournament_name = container
        .select(&event_sel)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN_TOURNAMENT.to_string());

    let series_sel = Selector::parse(".match-item-event-series").unwrap();
    let stage = container
        .select(&series_sel)
        .next()
        .map(element_text)
        .unwrap_or_default();

    // The bo marker rides along in the time cell; the listing page has
    // no dedicated format element.
    let match_format = if time_lower.contains("bo1") {
        "Bo1"
    } else if time_lower.contains("bo5") {
        "Bo5"
    } else {
        "Bo3"
    }
    .to_string();

    Some(ListingMatch {
        vlr_match_id,
        match_url,
        team1_name,
        team2_name,
        team1_score,
        team2_score,
        tournament_name,
        stage,
        status,
        match_time,
        match_format,
    })
}

fn element_text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const BASE: &str = "https://www.vlr.gg";

    fn now() -> DateTime<Utc> {
        "2025-06-27T12:00:00Z".parse().unwrap()
    }

    fn item(href: &str, time: &str, names: [&str; 2], scores: [&str; 2], extra: &str) -> String {
        format!(
            r#"<a class="match-item" href="{href}">
                <div class="match-item-time">{time}</div>
                <div class="match-item-vs-team-name">{}</div>
                <div class="match-item-vs-team-name">{}</div>
                <div class="match-item-vs-team-score">{}</div>
                <div class="match-item-vs-team-score">{}</div>
                {extra}
            </a>"#,
            names[0], names[1], scores[0], scores[1],
        )
    }

    fn event(name: &str, series: &str) -> String {
        format!(
            r#"<div class="match-item-event">{name}</div>
               <div class="match-item-event-series">{series}</div>"#
        )
    }

    #[test]
    fn upcoming_match_row() {
        let html = item(
            "/353177/sentinels-vs-fnatic-champions-2025",
            "2h 30m",
            ["Sentinels", "Fnatic"],
            ["–", "–"],
            &event("Valorant Champions 2025", "Playoffs: Upper Final"),
        );

        let matches = parse_listing(&html, BASE, now());
        assert_eq!(matches.len(), 1);

        let m = &matches[0];
        assert_eq!(m.vlr_match_id, "353177");
        assert_eq!(
            m.match_url,
            "https://www.vlr.gg/353177/sentinels-vs-fnatic-champions-2025"
        );
        assert_eq!(m.team1_name.as_deref(), Some("Sentinels"));
        assert_eq!(m.team2_name.as_deref(), Some("Fnatic"));
        assert_eq!((m.team1_score, m.team2_score), (0, 0));
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.match_time, Some(now() + Duration::minutes(150)));
        assert_eq!(m.tournament_name, "Valorant Champions 2025");
        assert_eq!(m.stage, "Playoffs: Upper Final");
        assert_eq!(m.match_format, "Bo3");
    }

    #[test]
    fn live_match_row() {
        let html = item(
            "/353178/drx-vs-prx-champions-2025/",
            "LIVE",
            ["DRX", "Paper Rex"],
            ["1", "0"],
            &event("Valorant Champions 2025", "Group Stage"),
        );

        let m = &parse_listing(&html, BASE, now())[0];
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.match_time, Some(now()));
        assert_eq!((m.team1_score, m.team2_score), (1, 0));
    }

    #[test]
    fn completed_match_row() {
        let html = item(
            "/353001/loud-vs-kru-challengers/",
            "Completed",
            ["LOUD", "KRÜ"],
            ["13", "7"],
            &event("Challengers BR", ""),
        );

        let m = &parse_listing(&html, BASE, now())[0];
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.match_time, None);
        assert_eq!((m.team1_score, m.team2_score), (13, 7));
    }

    #[test]
    fn missing_tournament_defaults() {
        let html = item(
            "/353002/tbd-vs-tbd/",
            "1d 4h",
            ["TBD", "TBD"],
            ["–", "–"],
            "",
        );

        let m = &parse_listing(&html, BASE, now())[0];
        assert_eq!(m.tournament_name, UNKNOWN_TOURNAMENT);
        assert_eq!(m.stage, "");
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.match_time, Some(now() + Duration::hours(28)));
    }

    #[test]
    fn format_marker_in_time_cell() {
        let html = item(
            "/353003/edg-vs-th-showmatch/",
            "Bo5 3h",
            ["EDG", "Heretics"],
            ["–", "–"],
            "",
        );

        let m = &parse_listing(&html, BASE, now())[0];
        assert_eq!(m.match_format, "Bo5");
        // Format marker pollutes the countdown text, so the time stays
        // unknown rather than guessed.
        assert_eq!(m.match_time, None);
    }

    #[test]
    fn decoration_rows_are_skipped() {
        let mut html = String::from(r#"<a class="match-item" href="/matches/results">More</a>"#);
        for i in 0..3 {
            html.push_str(&item(
                &format!("/35310{i}/a-vs-b/"),
                "1h 5m",
                ["Alpha", "Bravo"],
                ["–", "–"],
                "",
            ));
        }
        // One anchor with no href at all
        html.push_str(r#"<a class="match-item"><div class="match-item-time">5m</div></a>"#);

        let matches = parse_listing(&html, BASE, now());
        assert_eq!(matches.len(), 3);
    }
}
