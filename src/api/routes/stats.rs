use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{aggregate_stats, filter_tournaments, StatsFilter};
use crate::models::AggregatedStatRow;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub month: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Tournaments that matched the filter
    pub tournaments: usize,
    pub rows: Vec<AggregatedStatRow>,
}

/// Aggregate player statistics over the collected dataset.
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no dataset collected yet".to_string()))?;

    let filter = StatsFilter::new(params.month, params.name);
    let tournaments = filter_tournaments(&dataset.tournaments, &filter).len();
    let rows = aggregate_stats(
        &dataset.tournaments,
        &filter,
        &dataset.results,
        &dataset.tallies,
    );

    Ok(Json(StatsResponse { tournaments, rows }))
}
