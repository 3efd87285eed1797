//! Per-tournament result rows.

use serde::{Deserialize, Serialize};

/// One placed player in one tournament's results feed.
///
/// The identity has already been resolved from the feed's fallback fields;
/// rows without a resolvable identity are dropped at the wire boundary and
/// never reach the aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    /// Resolved player identity
    pub player: String,

    /// Tournament score
    pub points: f64,

    /// Performance rating for this event, 0 when the feed omits it
    pub performance: f64,
}

impl ResultRow {
    pub fn new(player: String, points: f64, performance: f64) -> Self {
        Self {
            player,
            points,
            performance,
        }
    }
}
