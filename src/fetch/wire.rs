//! Wire shapes for the arena service feeds.
//!
//! Every feed is NDJSON, one JSON object per line. Parsing is best-effort:
//! a malformed line is logged and skipped, and a row whose player identity
//! does not resolve is dropped here rather than aborting the feed.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::models::{resolve_player, Color, GameRecord, ResultRow, Tournament};

/// One tournament from the team arena feed or the tournament endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTournament {
    pub id: String,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub starts_at: Option<f64>,

    #[serde(default)]
    pub minutes: Option<u32>,

    #[serde(default)]
    pub nb_players: Option<u32>,
}

impl WireTournament {
    /// Normalize into the domain model (timestamp unit handling included).
    pub fn into_tournament(self) -> Tournament {
        Tournament::new(
            self.id,
            self.full_name.unwrap_or_default(),
            self.starts_at,
            self.minutes,
            self.nb_players,
        )
    }
}

/// Nested user object some payloads carry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub id: Option<String>,
}

/// One row of the arena results feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResultRow {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub user: Option<WireUser>,

    /// Tournament score
    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub performance: Option<f64>,
}

impl WireResultRow {
    /// Resolve into a normalized row. `None` when no identity field resolves.
    pub fn into_result_row(self) -> Option<ResultRow> {
        let player = resolve_player([
            self.username.as_deref(),
            self.name.as_deref(),
            self.user.as_ref().and_then(|u| u.name.as_deref()),
        ])?
        .to_string();

        Some(ResultRow::new(
            player,
            self.score.unwrap_or(0.0),
            self.performance.unwrap_or(0.0),
        ))
    }
}

/// One side of a game in the games feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSide {
    #[serde(default)]
    pub user: Option<WireUser>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl WireSide {
    fn player(&self) -> Option<&str> {
        resolve_player([
            self.user.as_ref().and_then(|u| u.name.as_deref()),
            self.user_id.as_deref(),
            self.name.as_deref(),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WirePlayers {
    #[serde(default)]
    pub white: Option<WireSide>,

    #[serde(default)]
    pub black: Option<WireSide>,
}

/// One game of the tournament games feed.
#[derive(Debug, Clone, Deserialize)]
pub struct WireGame {
    /// "white", "black", or anything else meaning a draw
    #[serde(default)]
    pub winner: Option<String>,

    #[serde(default)]
    pub players: Option<WirePlayers>,
}

impl WireGame {
    pub fn into_game_record(self) -> GameRecord {
        let winner = match self.winner.as_deref() {
            Some("white") => Some(Color::White),
            Some("black") => Some(Color::Black),
            _ => None,
        };

        let players = self.players.unwrap_or_default();
        GameRecord::new(
            players
                .white
                .as_ref()
                .and_then(WireSide::player)
                .map(str::to_string),
            players
                .black
                .as_ref()
                .and_then(WireSide::player)
                .map(str::to_string),
            winner,
        )
    }
}

/// Parse an NDJSON body into typed records, skipping malformed lines.
pub fn parse_ndjson<T: DeserializeOwned>(body: &str) -> Vec<T> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping malformed NDJSON line: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ndjson_skips_malformed_lines() {
        let body = r#"{"id":"t1","fullName":"Blitz"}
not json
{"id":"t2"}

"#;
        let parsed: Vec<WireTournament> = parse_ndjson(body);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "t1");
        assert_eq!(parsed[1].id, "t2");
    }

    #[test]
    fn test_result_row_identity_priority() {
        let row: WireResultRow =
            serde_json::from_str(r#"{"username":"alice","user":{"name":"nested"},"score":7}"#)
                .unwrap();
        let row = row.into_result_row().unwrap();
        assert_eq!(row.player, "alice");
        assert_eq!(row.points, 7.0);
        assert_eq!(row.performance, 0.0);
    }

    #[test]
    fn test_result_row_nested_user_fallback() {
        let row: WireResultRow =
            serde_json::from_str(r#"{"user":{"name":"carol"},"score":3,"performance":1444}"#)
                .unwrap();
        let row = row.into_result_row().unwrap();
        assert_eq!(row.player, "carol");
        assert_eq!(row.performance, 1444.0);
    }

    #[test]
    fn test_result_row_without_identity_dropped() {
        let row: WireResultRow = serde_json::from_str(r#"{"score":5}"#).unwrap();
        assert!(row.into_result_row().is_none());
    }

    #[test]
    fn test_game_unknown_winner_is_draw() {
        let game: WireGame = serde_json::from_str(
            r#"{"winner":"timeout","players":{"white":{"userId":"a"},"black":{"userId":"b"}}}"#,
        )
        .unwrap();
        let record = game.into_game_record();
        assert_eq!(record.winner, None);
        assert_eq!(record.white.as_deref(), Some("a"));
        assert_eq!(record.black.as_deref(), Some("b"));
    }

    #[test]
    fn test_game_side_identity_priority() {
        let game: WireGame = serde_json::from_str(
            r#"{"winner":"white","players":{"white":{"user":{"name":"Alice"},"userId":"alice"},"black":{"name":"Anonymous"}}}"#,
        )
        .unwrap();
        let record = game.into_game_record();
        assert_eq!(record.white.as_deref(), Some("Alice"));
        assert_eq!(record.black.as_deref(), Some("Anonymous"));
        assert_eq!(record.winner, Some(Color::White));
    }

    #[test]
    fn test_game_missing_side_stays_missing() {
        let game: WireGame =
            serde_json::from_str(r#"{"players":{"white":{"userId":"a"}}}"#).unwrap();
        let record = game.into_game_record();
        assert!(record.black.is_none());
    }

    #[test]
    fn test_tournament_seconds_timestamp_normalized() {
        let wire: WireTournament =
            serde_json::from_str(r#"{"id":"t1","fullName":"Blitz","startsAt":1710504000}"#)
                .unwrap();
        let tournament = wire.into_tournament();
        assert_eq!(tournament.starts_at, 1_710_504_000_000);
    }
}
