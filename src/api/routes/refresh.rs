use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::StatsFilter;
use crate::collect::{CollectOptions, CollectState};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub month: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub games: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub state: CollectState,
}

/// Start a collection pass in the background.
///
/// A failed pass leaves the previously collected dataset untouched; the
/// failure is visible through the status endpoint instead.
pub async fn trigger(
    State(state): State<AppState>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    if state.collector.is_running().await {
        return Err(ApiError::Conflict(
            "a collection pass is already running".to_string(),
        ));
    }

    let request = body.map(|Json(r)| r).unwrap_or_default();
    let opts = CollectOptions {
        filter: StatsFilter::new(request.month, request.name),
        include_games: request.games,
    };

    let collector = state.collector.clone();
    let dataset_slot = state.dataset.clone();
    tokio::spawn(async move {
        match collector.collect_once(&opts).await {
            Ok(dataset) => {
                info!(
                    "Refresh completed: {} tournaments",
                    dataset.tournaments.len()
                );
                *dataset_slot.write().await = Some(dataset);
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
            }
        }
    });

    Ok(Json(RefreshResponse {
        state: state.collector.state().await,
    }))
}

/// Current state of the collector.
pub async fn status(State(state): State<AppState>) -> Json<CollectState> {
    Json(state.collector.state().await)
}
