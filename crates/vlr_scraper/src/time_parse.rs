use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

// "2h 30m", "48m"
static HOUR_MIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)h\s*)?(\d+)m$").unwrap());

// "1d 4h", "2d" — the tail after the day token is inspected separately
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)d(.*)$").unwrap());
static DAY_TAIL_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)h$").unwrap());

/// Converts a relative countdown label from a listing row into an
/// absolute timestamp. vlr shows "2h 30m" / "48m" style countdowns for
/// upcoming matches, "1d 4h" further out, and the word "LIVE" once a
/// match is running.
///
/// Returns `None` for anything unrecognized; inconsistent source
/// formatting must never abort a scrape pass. A label carrying a day
/// token can only ever take the day branch: "1d 4h" is 28 hours out,
/// never 4 minutes, and a tail without an hour fragment is ignored, so
/// "1d 5m" reads as one day out.
pub fn parse_time_label(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if text.contains("live") {
        return Some(now);
    }

    if let Some(caps) = HOUR_MIN_RE.captures(&text) {
        let hours: i64 = caps.get(1).map_or(Some(0), |m| m.as_str().parse().ok())?;
        let minutes: i64 = caps.get(2)?.as_str().parse().ok()?;
        return Some(now + Duration::minutes(hours * 60 + minutes));
    }

    if let Some(caps) = DAY_RE.captures(&text) {
        let days: i64 = caps.get(1)?.as_str().parse().ok()?;
        let tail = caps.get(2).map_or("", |m| m.as_str());
        let hours: i64 = if tail.contains('h') {
            DAY_TAIL_HOUR_RE.captures(tail)?.get(1)?.as_str().parse().ok()?
        } else {
            0
        };
        return Some(now + Duration::hours(days * 24 + hours));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-27T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn minutes_only() {
        assert_eq!(
            parse_time_label("48m", now()),
            Some(now() + Duration::minutes(48))
        );
    }

    #[test]
    fn hours_and_minutes() {
        assert_eq!(
            parse_time_label("2h 30m", now()),
            Some(now() + Duration::minutes(150))
        );
        assert_eq!(
            parse_time_label("2h30m", now()),
            Some(now() + Duration::minutes(150))
        );
    }

    #[test]
    fn days_and_hours() {
        assert_eq!(
            parse_time_label("1d 4h", now()),
            Some(now() + Duration::hours(28))
        );
        assert_eq!(
            parse_time_label("3d", now()),
            Some(now() + Duration::hours(72))
        );
    }

    #[test]
    fn day_token_wins_over_minute_form() {
        assert_eq!(parse_time_label("1d", now()), Some(now() + Duration::hours(24)));
        // A trailing minute fragment never demotes a day label to the
        // minute branch; it is ignored and the label reads as one day out.
        assert_eq!(
            parse_time_label("1d 5m", now()),
            Some(now() + Duration::hours(24))
        );
        // An hour fragment followed by more text is malformed
        assert_eq!(parse_time_label("1d 4h 30m", now()), None);
    }

    #[test]
    fn live_marker() {
        assert_eq!(parse_time_label("LIVE", now()), Some(now()));
        assert_eq!(parse_time_label("Live now", now()), Some(now()));
    }

    #[test]
    fn unparseable_is_unknown() {
        assert_eq!(parse_time_label("garbage", now()), None);
        assert_eq!(parse_time_label("6:00 PM", now()), None);
        assert_eq!(parse_time_label("2h", now()), None);
        assert_eq!(parse_time_label("", now()), None);
    }
}
