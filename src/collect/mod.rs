//! Collection orchestrator.
//!
//! Gathers everything one aggregation pass consumes: resolve the tournament
//! list, filter it, then fetch each tournament's results (and optionally
//! games) strictly one at a time. The sequential loop is a rate-limiting
//! courtesy to the arena service, not an optimization. A pass either
//! completes with a full dataset or fails as a whole; data fetched before a
//! failure is discarded rather than partially surfaced.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::calculate::{build_tally, filter_tournaments, StatsFilter};
use crate::fetch::{ArenaSource, FetchError};
use crate::models::{GameTally, ResultRow, Tournament};

/// Errors that can occur during collection.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("No team or tournament identifiers configured")]
    NoTournaments,
}

/// Where the tournament list comes from.
#[derive(Debug, Clone, Default)]
pub struct CollectConfig {
    /// Team whose arena feed supplies the tournaments
    pub team: Option<String>,

    /// Explicit tournament ids, fetched individually
    pub tournaments: Vec<String>,
}

/// Per-pass options.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Month/name filter applied before any per-tournament fetch
    pub filter: StatsFilter,

    /// Also fetch games and build per-player tallies
    pub include_games: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// State of a collection pass, exposed for progress reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectState {
    pub status: CollectStatus,

    /// Tournaments fully fetched so far
    pub completed: u32,

    /// Tournaments selected for this pass
    pub total: u32,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    pub errors: Vec<String>,
}

/// Everything one aggregation pass consumes.
#[derive(Debug, Clone, Default)]
pub struct ArenaDataset {
    /// Filtered tournaments, in feed order
    pub tournaments: Vec<Tournament>,

    /// Result rows keyed by tournament id
    pub results: HashMap<String, Vec<ResultRow>>,

    /// Per-player tallies keyed by tournament id; empty when games were not
    /// requested
    pub tallies: HashMap<String, HashMap<String, GameTally>>,
}

/// Collection orchestrator.
pub struct Collector {
    config: CollectConfig,
    source: Arc<dyn ArenaSource>,
    state: Arc<RwLock<CollectState>>,
}

impl Collector {
    /// Create a new collector.
    pub fn new(config: CollectConfig, source: Arc<dyn ArenaSource>) -> Self {
        Self {
            config,
            source,
            state: Arc::new(RwLock::new(CollectState::default())),
        }
    }

    /// Get the current collection state.
    pub async fn state(&self) -> CollectState {
        self.state.read().await.clone()
    }

    /// Check if a pass is currently running.
    pub async fn is_running(&self) -> bool {
        self.state.read().await.status == CollectStatus::Running
    }

    /// Run a single collection pass.
    ///
    /// Configuration problems are detected before any fetch. The first
    /// fetch failure aborts the remaining sequence and discards whatever
    /// was already fetched this pass.
    pub async fn collect_once(&self, opts: &CollectOptions) -> Result<ArenaDataset, CollectError> {
        if self.config.team.is_none() && self.config.tournaments.is_empty() {
            return Err(CollectError::NoTournaments);
        }

        {
            let mut state = self.state.write().await;
            *state = CollectState {
                status: CollectStatus::Running,
                started_at: Some(Utc::now()),
                ..Default::default()
            };
        }

        match self.run(opts).await {
            Ok(dataset) => {
                let mut state = self.state.write().await;
                state.status = CollectStatus::Completed;
                state.completed_at = Some(Utc::now());
                Ok(dataset)
            }
            Err(e) => {
                error!("Collection pass failed: {}", e);
                let mut state = self.state.write().await;
                state.status = CollectStatus::Failed;
                state.completed_at = Some(Utc::now());
                state.errors.push(e.to_string());
                Err(e)
            }
        }
    }

    async fn run(&self, opts: &CollectOptions) -> Result<ArenaDataset, CollectError> {
        let all = self.tournament_list().await?;
        let filtered: Vec<Tournament> = filter_tournaments(&all, &opts.filter)
            .into_iter()
            .cloned()
            .collect();

        let total = filtered.len() as u32;
        self.state.write().await.total = total;
        info!("Collecting {} of {} tournaments", total, all.len());

        let mut results = HashMap::new();
        let mut tallies = HashMap::new();

        for (index, tournament) in filtered.iter().enumerate() {
            let rows = self.source.arena_results(&tournament.id).await?;
            results.insert(tournament.id.clone(), rows);

            if opts.include_games {
                let games = self.source.arena_games(&tournament.id).await?;
                tallies.insert(tournament.id.clone(), build_tally(&games));
            }

            let completed = index as u32 + 1;
            self.state.write().await.completed = completed;
            info!(
                "Tournament {} done ({}/{})",
                tournament.id, completed, total
            );
        }

        Ok(ArenaDataset {
            tournaments: filtered,
            results,
            tallies,
        })
    }

    async fn tournament_list(&self) -> Result<Vec<Tournament>, CollectError> {
        if let Some(team) = &self.config.team {
            return Ok(self.source.team_arenas(team).await?);
        }

        let mut tournaments = Vec::with_capacity(self.config.tournaments.len());
        for id in &self.config.tournaments {
            tournaments.push(self.source.arena(id).await?);
        }
        Ok(tournaments)
    }
}
