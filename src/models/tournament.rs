//! Arena tournament model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw start timestamps below this value are in seconds, not milliseconds.
const MILLIS_THRESHOLD: f64 = 10_000_000_000.0;

/// A team arena tournament as reported by the arena service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Service-assigned identifier
    pub id: String,

    /// Full display name (e.g., "Weekly Blitz Team Battle")
    pub full_name: String,

    /// Start time in epoch milliseconds, already normalized
    pub starts_at: i64,

    /// Scheduled length in minutes
    pub minutes: Option<u32>,

    /// Number of entered players
    pub nb_players: Option<u32>,
}

impl Tournament {
    /// Build a Tournament from feed values, normalizing the start timestamp.
    pub fn new(
        id: String,
        full_name: String,
        raw_starts_at: Option<f64>,
        minutes: Option<u32>,
        nb_players: Option<u32>,
    ) -> Self {
        Self {
            id,
            full_name,
            starts_at: normalize_start_millis(raw_starts_at),
            minutes,
            nb_players,
        }
    }

    /// UTC calendar month of the start time, as `YYYY-MM`.
    pub fn month_key(&self) -> String {
        month_key(self.starts_at)
    }
}

/// Normalize a raw start timestamp to epoch milliseconds.
///
/// The feeds are inconsistent about units: values below 1e10 are seconds
/// since epoch and get scaled up, anything larger is already milliseconds.
/// Missing or non-finite values fall back to the time of construction.
pub fn normalize_start_millis(raw: Option<f64>) -> i64 {
    match raw {
        Some(v) if v.is_finite() => {
            if v < MILLIS_THRESHOLD {
                (v * 1000.0) as i64
            } else {
                v as i64
            }
        }
        _ => Utc::now().timestamp_millis(),
    }
}

/// UTC calendar month (`YYYY-MM`) of an epoch-milliseconds timestamp.
pub fn month_key(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m").to_string(),
        None => String::new(),
    }
}
