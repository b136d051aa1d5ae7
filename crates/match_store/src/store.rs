use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

use crate::models::{
    MatchUpsert, ScrapeLogEntry, StoredMatch, Team, Tournament, UpsertOutcome,
};
use crate::Result;

// Source strings that mean "no team yet", not a team called "TBD".
const PLACEHOLDER_NAMES: [&str; 3] = ["tbd", "–", "-"];

pub struct MatchStore {
    conn: Connection,
}

impl MatchStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        // The scheduled pass and an on-demand enrichment can write at the
        // same time; wait out a briefly locked database instead of failing.
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;

        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    // ── Entity resolution ────────────────────────────────────────────

    /// Name-keyed lookup-or-create. Placeholder names resolve to `None`
    /// and never create a row. UNIQUE(name) makes this safe against a
    /// concurrent resolver: the losing insert is a no-op and the
    /// follow-up select observes the winner's row.
    pub fn resolve_team(&self, name: &str, flag_url: Option<&str>) -> Result<Option<i64>> {
        let name = name.trim();
        if is_placeholder(name) {
            return Ok(None);
        }

        let inserted = self.conn.execute(
            "INSERT INTO teams(name, flag_url, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING",
            params![name, flag_url, Utc::now()],
        )?;
        if inserted > 0 {
            debug!("new team: {name}");
        }

        let id = self
            .conn
            .query_row("SELECT id FROM teams WHERE name = ?1", params![name], |r| {
                r.get(0)
            })?;
        Ok(Some(id))
    }

    pub fn resolve_tournament(&self, name: &str, logo_url: Option<&str>) -> Result<Option<i64>> {
        let name = name.trim();
        if is_placeholder(name) {
            return Ok(None);
        }

        let inserted = self.conn.execute(
            "INSERT INTO tournaments(name, logo_url, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING",
            params![name, logo_url, Utc::now()],
        )?;
        if inserted > 0 {
            debug!("new tournament: {name}");
        }

        let id = self.conn.query_row(
            "SELECT id FROM tournaments WHERE name = ?1",
            params![name],
            |r| r.get(0),
        )?;
        Ok(Some(id))
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Upserts one listing-level match record, keyed on the external
    /// vlr id. A fresh id resolves its entities and inserts the full
    /// record; a known id only refreshes what a listing row can
    /// observe: scores, status, time. The detail payload is never
    /// touched from here.
    pub fn upsert_match(&self, rec: &MatchUpsert) -> Result<UpsertOutcome> {
        let now = Utc::now();

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM matches WHERE vlr_match_id = ?1",
                params![rec.vlr_match_id],
                |r| r.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            self.conn.execute(
                "UPDATE matches
                 SET team1_score = ?1, team2_score = ?2, status = ?3,
                     match_time = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    rec.team1_score,
                    rec.team2_score,
                    rec.status,
                    rec.match_time,
                    now,
                    id
                ],
            )?;
            return Ok(UpsertOutcome::Updated);
        }

        let team1_id = self.resolve_team(rec.team1_name.as_deref().unwrap_or(""), None)?;
        let team2_id = self.resolve_team(rec.team2_name.as_deref().unwrap_or(""), None)?;
        let tournament_id = self.resolve_tournament(&rec.tournament_name, None)?;

        // ON CONFLICT keeps a concurrent create of the same id from
        // duplicating; the loser degrades to the listing-field update.
        self.conn.execute(
            "INSERT INTO matches(vlr_match_id, team1_id, team2_id, tournament_id,
                                 status, match_time, match_format, stage,
                                 team1_score, team2_score, match_url,
                                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(vlr_match_id) DO UPDATE SET
                 team1_score = excluded.team1_score,
                 team2_score = excluded.team2_score,
                 status = excluded.status,
                 match_time = excluded.match_time,
                 updated_at = excluded.updated_at",
            params![
                rec.vlr_match_id,
                team1_id,
                team2_id,
                tournament_id,
                rec.status,
                rec.match_time,
                rec.match_format,
                rec.stage,
                rec.team1_score,
                rec.team2_score,
                rec.match_url,
                now,
                now
            ],
        )?;
        Ok(UpsertOutcome::Created)
    }

    /// Writes the detail-flow payloads for a stored match. Identity and
    /// listing-observed fields stay untouched. Returns false when no
    /// such match exists.
    pub fn update_match_detail<M: Serialize>(
        &self,
        vlr_match_id: &str,
        maps: &M,
        player_stats: &serde_json::Value,
    ) -> Result<bool> {
        let maps_json = serde_json::to_string(maps)?;
        let player_stats_json = serde_json::to_string(player_stats)?;
        let n = self.conn.execute(
            "UPDATE matches SET maps_data = ?1, player_stats = ?2, updated_at = ?3
             WHERE vlr_match_id = ?4",
            params![maps_json, player_stats_json, Utc::now(), vlr_match_id],
        )?;
        Ok(n > 0)
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn match_by_vlr_id(&self, vlr_match_id: &str) -> Result<Option<StoredMatch>> {
        let m = self
            .conn
            .query_row(
                &format!("{MATCH_SELECT} WHERE vlr_match_id = ?1"),
                params![vlr_match_id],
                row_to_match,
            )
            .optional()?;
        Ok(m)
    }

    pub fn list_matches(&self, status: Option<&str>) -> Result<Vec<StoredMatch>> {
        let mut out = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{MATCH_SELECT} WHERE status = ?1 ORDER BY updated_at DESC"
                ))?;
                let rows = stmt.query_map(params![status], row_to_match)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{MATCH_SELECT} ORDER BY updated_at DESC"))?;
                let rows = stmt.query_map([], row_to_match)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    /// Completed matches still waiting for their per-map breakdown,
    /// most recently touched first. Feeds the detail backfill.
    pub fn matches_missing_detail(&self, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT vlr_match_id FROM matches
             WHERE status = 'completed' AND maps_data IS NULL
             ORDER BY updated_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |r| r.get(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, flag_url, logo_url, created_at FROM teams ORDER BY name")?;
        let rows = stmt.query_map([], |r| {
            Ok(Team {
                id: r.get(0)?,
                name: r.get(1)?,
                flag_url: r.get(2)?,
                logo_url: r.get(3)?,
                created_at: r.get(4)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, logo_url, created_at FROM tournaments ORDER BY name")?;
        let rows = stmt.query_map([], |r| {
            Ok(Tournament {
                id: r.get(0)?,
                name: r.get(1)?,
                logo_url: r.get(2)?,
                created_at: r.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // ── Audit log ────────────────────────────────────────────────────

    pub fn append_scrape_log(
        &self,
        scrape_type: &str,
        url: &str,
        status: &str,
        error_message: Option<&str>,
        matches_found: i64,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO scrape_log(scrape_type, url, status, error_message, matches_found, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![scrape_type, url, status, error_message, matches_found, Utc::now()],
        )?;
        Ok(())
    }

    pub fn recent_scrape_log(&self, limit: usize) -> Result<Vec<ScrapeLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scrape_type, url, status, error_message, matches_found, created_at
             FROM scrape_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |r| {
            Ok(ScrapeLogEntry {
                id: r.get(0)?,
                scrape_type: r.get(1)?,
                url: r.get(2)?,
                status: r.get(3)?,
                error_message: r.get(4)?,
                matches_found: r.get(5)?,
                created_at: r.get(6)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn last_successful_scrape(&self) -> Result<Option<DateTime<Utc>>> {
        let ts = self
            .conn
            .query_row(
                "SELECT created_at FROM scrape_log WHERE status = 'success'
                 ORDER BY id DESC LIMIT 1",
                [],
                |r| r.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

fn is_placeholder(name: &str) -> bool {
    name.is_empty() || PLACEHOLDER_NAMES.contains(&name.to_lowercase().as_str())
}

const MATCH_SELECT: &str = "SELECT id, vlr_match_id, team1_id, team2_id, tournament_id,
        status, match_time, match_format, stage, team1_score, team2_score,
        match_url, vod_url, stats_url, maps_data, player_stats,
        created_at, updated_at
 FROM matches";

fn row_to_match(r: &Row<'_>) -> rusqlite::Result<StoredMatch> {
    Ok(StoredMatch {
        id: r.get(0)?,
        vlr_match_id: r.get(1)?,
        team1_id: r.get(2)?,
        team2_id: r.get(3)?,
        tournament_id: r.get(4)?,
        status: r.get(5)?,
        match_time: r.get(6)?,
        match_format: r.get(7)?,
        stage: r.get(8)?,
        team1_score: r.get(9)?,
        team2_score: r.get(10)?,
        match_url: r.get(11)?,
        vod_url: r.get(12)?,
        stats_url: r.get(13)?,
        maps_data: r.get(14)?,
        player_stats: r.get(15)?,
        created_at: r.get(16)?,
        updated_at: r.get(17)?,
    })
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            flag_url TEXT,
            logo_url TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tournaments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            logo_url TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vlr_match_id TEXT NOT NULL UNIQUE,
            team1_id INTEGER REFERENCES teams(id),
            team2_id INTEGER REFERENCES teams(id),
            tournament_id INTEGER REFERENCES tournaments(id),
            status TEXT NOT NULL,
            match_time TEXT,
            match_format TEXT NOT NULL,
            stage TEXT NOT NULL DEFAULT '',
            team1_score INTEGER NOT NULL DEFAULT 0,
            team2_score INTEGER NOT NULL DEFAULT 0,
            match_url TEXT,
            vod_url TEXT,
            stats_url TEXT,
            maps_data TEXT,
            player_stats TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_matches_status ON matches(status);
        CREATE INDEX IF NOT EXISTS idx_matches_time ON matches(match_time);

        CREATE TABLE IF NOT EXISTS scrape_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scrape_type TEXT NOT NULL,
            url TEXT NOT NULL,
            status TEXT NOT NULL,
            error_message TEXT,
            matches_found INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_scrape_log_ts ON scrape_log(created_at);
        "#,
    )?;
    Ok(())
}
