//! # Arena Stats
//!
//! Aggregates player performance statistics across a team's arena
//! tournaments fetched from an external arena-tournament service.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (tournaments, result rows, tallies, stat rows)
//! - **calculate**: The pure aggregation engine (filter, tally, fold, finalize)
//! - **fetch**: HTTP client for the arena service's NDJSON feeds
//! - **collect**: Sequential collection orchestrator feeding the engine
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod collect;
pub mod config;
pub mod fetch;
pub mod models;

pub use models::*;
