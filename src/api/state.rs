use std::sync::Arc;

use tokio::sync::RwLock;

use crate::collect::{ArenaDataset, Collector};
use crate::config::AppConfig;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub collector: Arc<Collector>,
    /// Latest successfully collected dataset. A failed refresh never
    /// replaces it.
    pub dataset: Arc<RwLock<Option<ArenaDataset>>>,
}
