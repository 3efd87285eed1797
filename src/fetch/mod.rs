//! HTTP client for the arena tournament service.
//!
//! Fetches the team arena feed, per-tournament results, and per-tournament
//! games (all NDJSON) and converts them into normalized models. Responses
//! can be cached on disk so repeated passes don't hammer the service.

pub mod wire;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::models::{GameRecord, ResultRow, Tournament};
use wire::{parse_ndjson, WireGame, WireResultRow, WireTournament};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the arena client.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Base URL of the arena service
    pub base_url: String,

    /// Optional bearer token
    pub token: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Delay before each request (rate-limiting courtesy)
    pub request_delay: Duration,

    /// Directory for cached responses; `None` disables caching
    pub cache_dir: Option<PathBuf>,

    /// How long cached responses are considered fresh
    pub cache_ttl: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lichess.org".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("arena-stats/{}", env!("CARGO_PKG_VERSION")),
            request_delay: Duration::from_millis(1000),
            cache_dir: None,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Seam between the collector and the arena service.
#[async_trait]
pub trait ArenaSource: Send + Sync {
    /// Fetch a single tournament by id.
    async fn arena(&self, id: &str) -> Result<Tournament, FetchError>;

    /// Fetch all arena tournaments of a team.
    async fn team_arenas(&self, team_id: &str) -> Result<Vec<Tournament>, FetchError>;

    /// Fetch a tournament's results feed.
    async fn arena_results(&self, id: &str) -> Result<Vec<ResultRow>, FetchError>;

    /// Fetch a tournament's games, reduced to what the tally builder needs.
    async fn arena_games(&self, id: &str) -> Result<Vec<GameRecord>, FetchError>;
}

/// HTTP client with optional on-disk response caching.
pub struct ArenaClient {
    client: Client,
    config: ArenaConfig,
}

impl ArenaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("arena-stats/0.1.0")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/x-ndjson"));
        if let Some(token) = &config.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Url::parse(&self.config.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", self.config.base_url, path, e)))
    }

    /// GET a URL, honoring the request delay and the response cache.
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(cached) = self.read_cache(url).await? {
            return Ok(cached);
        }

        tokio::time::sleep(self.config.request_delay).await;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or_default().to_string(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        self.write_cache(url, &body).await?;
        Ok(body)
    }

    fn cache_path(&self, url: &Url) -> Option<PathBuf> {
        let dir = self.config.cache_dir.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let key = hex::encode(hasher.finalize());
        Some(dir.join(format!("{}.body", &key[..16])))
    }

    async fn read_cache(&self, url: &Url) -> Result<Option<String>, FetchError> {
        let Some(path) = self.cache_path(url) else {
            return Ok(None);
        };
        let Ok(meta) = fs::metadata(&path).await else {
            return Ok(None);
        };
        let fresh = meta
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age <= self.config.cache_ttl)
            .unwrap_or(false);
        if !fresh {
            return Ok(None);
        }
        debug!("Cache hit for {}", url);
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn write_cache(&self, url: &Url, body: &str) -> Result<(), FetchError> {
        let Some(path) = self.cache_path(url) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl ArenaSource for ArenaClient {
    async fn arena(&self, id: &str) -> Result<Tournament, FetchError> {
        let url = self.endpoint(&format!("/api/tournament/{}", id))?;
        let body = self.get_text(&url).await?;
        let wire: WireTournament = serde_json::from_str(&body)?;
        Ok(wire.into_tournament())
    }

    async fn team_arenas(&self, team_id: &str) -> Result<Vec<Tournament>, FetchError> {
        let url = self.endpoint(&format!("/api/team/{}/arena", team_id))?;
        let body = self.get_text(&url).await?;
        let tournaments: Vec<Tournament> = parse_ndjson::<WireTournament>(&body)
            .into_iter()
            .map(WireTournament::into_tournament)
            .collect();
        info!("Fetched {} arenas for team {}", tournaments.len(), team_id);
        Ok(tournaments)
    }

    async fn arena_results(&self, id: &str) -> Result<Vec<ResultRow>, FetchError> {
        let url = self.endpoint(&format!("/api/tournament/{}/results", id))?;
        let body = self.get_text(&url).await?;
        Ok(parse_ndjson::<WireResultRow>(&body)
            .into_iter()
            .filter_map(WireResultRow::into_result_row)
            .collect())
    }

    async fn arena_games(&self, id: &str) -> Result<Vec<GameRecord>, FetchError> {
        let url = self.endpoint(&format!("/api/tournament/{}/games?moves=false", id))?;
        let body = self.get_text(&url).await?;
        Ok(parse_ndjson::<WireGame>(&body)
            .into_iter()
            .map(WireGame::into_game_record)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_cache(dir: Option<PathBuf>) -> ArenaClient {
        ArenaClient::new(ArenaConfig {
            cache_dir: dir,
            request_delay: Duration::ZERO,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = client_with_cache(None);
        let url = client.endpoint("/api/tournament/abc").unwrap();
        assert_eq!(url.as_str(), "https://lichess.org/api/tournament/abc");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        let client = ArenaClient::new(ArenaConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            client.endpoint("/x"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_cache_path_stable_per_url() {
        let client = client_with_cache(Some(PathBuf::from("/tmp/cache")));
        let url = Url::parse("https://lichess.org/api/tournament/abc/results").unwrap();
        assert_eq!(client.cache_path(&url), client.cache_path(&url));
        let other = Url::parse("https://lichess.org/api/tournament/def/results").unwrap();
        assert_ne!(client.cache_path(&url), client.cache_path(&other));
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let client = client_with_cache(Some(tmp.path().to_path_buf()));
        let url = Url::parse("https://lichess.org/api/tournament/abc/results").unwrap();

        assert!(client.read_cache(&url).await.unwrap().is_none());
        client.write_cache(&url, "line1\nline2").await.unwrap();
        assert_eq!(
            client.read_cache(&url).await.unwrap().as_deref(),
            Some("line1\nline2")
        );
    }

    #[tokio::test]
    async fn test_cache_disabled_without_dir() {
        let client = client_with_cache(None);
        let url = Url::parse("https://lichess.org/api/tournament/abc").unwrap();
        client.write_cache(&url, "body").await.unwrap();
        assert!(client.read_cache(&url).await.unwrap().is_none());
    }
}
