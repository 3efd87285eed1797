use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{filter_tournaments, StatsFilter};

#[derive(Debug, Deserialize)]
pub struct TournamentParams {
    pub month: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TournamentSummary {
    pub id: String,
    pub full_name: String,
    pub starts_at: i64,
    pub month: String,
    pub minutes: Option<u32>,
    pub nb_players: Option<u32>,
}

/// List the collected tournaments matching the query filters.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TournamentParams>,
) -> Result<Json<Vec<TournamentSummary>>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no dataset collected yet".to_string()))?;

    let filter = StatsFilter::new(params.month, params.name);
    let summaries = filter_tournaments(&dataset.tournaments, &filter)
        .into_iter()
        .map(|t| TournamentSummary {
            id: t.id.clone(),
            full_name: t.full_name.clone(),
            starts_at: t.starts_at,
            month: t.month_key(),
            minutes: t.minutes,
            nb_players: t.nb_players,
        })
        .collect();

    Ok(Json(summaries))
}
