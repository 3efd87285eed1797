use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_stats::api::build_router;
use arena_stats::api::state::AppState;
use arena_stats::calculate::{aggregate_stats, StatsFilter};
use arena_stats::collect::{CollectConfig, CollectOptions, Collector};
use arena_stats::config::AppConfig;
use arena_stats::fetch::ArenaClient;

#[derive(Parser)]
#[command(name = "arena-stats")]
#[command(about = "Aggregate player statistics across team arena tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute aggregate player statistics
    Stats {
        /// Team whose arena feed supplies the tournaments
        #[arg(long)]
        team: Option<String>,

        /// Explicit tournament id (repeatable)
        #[arg(long = "tournament")]
        tournaments: Vec<String>,

        /// Only tournaments starting in this UTC month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Only tournaments whose name contains this substring
        #[arg(long)]
        name: Option<String>,

        /// Fetch games and derive win/draw/loss counts
        #[arg(long)]
        games: bool,
    },

    /// List matching tournaments
    Tournaments {
        /// Team whose arena feed supplies the tournaments
        #[arg(long)]
        team: Option<String>,

        /// Explicit tournament id (repeatable)
        #[arg(long = "tournament")]
        tournaments: Vec<String>,

        /// Only tournaments starting in this UTC month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Only tournaments whose name contains this substring
        #[arg(long)]
        name: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port number
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },
}

/// Merge CLI overrides into the configured tournament sources.
fn collect_config(
    config: &AppConfig,
    team: Option<String>,
    tournaments: Vec<String>,
) -> Result<CollectConfig> {
    let merged = CollectConfig {
        team: team.or_else(|| config.team.clone()),
        tournaments: if tournaments.is_empty() {
            config.tournaments.clone()
        } else {
            tournaments
        },
    };
    if merged.team.is_none() && merged.tournaments.is_empty() {
        bail!("no team or tournament ids configured; pass --team/--tournament or set them in the config file");
    }
    Ok(merged)
}

fn build_collector(config: &AppConfig, sources: CollectConfig) -> Result<Collector> {
    let client = ArenaClient::new(config.arena_config())
        .context("Failed to create arena client")?;
    Ok(Collector::new(sources, Arc::new(client)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::load(Path::new(&cli.config))
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    match cli.command {
        Commands::Stats {
            team,
            tournaments,
            month,
            name,
            games,
        } => {
            let sources = collect_config(&config, team, tournaments)?;
            let collector = build_collector(&config, sources)?;
            let opts = CollectOptions {
                filter: StatsFilter::new(month, name),
                include_games: games,
            };

            let dataset = collector
                .collect_once(&opts)
                .await
                .context("Collection pass failed")?;
            let stats = aggregate_stats(
                &dataset.tournaments,
                &opts.filter,
                &dataset.results,
                &dataset.tallies,
            );

            println!(
                "{:<4} {:<24} {:>7} {:>4} {:>4} {:>4} {:>6} {:>7} {:>6} {:>7}",
                "#", "Player", "Points", "W", "D", "L", "Games", "Win%", "Perf", "Events"
            );
            for (index, row) in stats.iter().enumerate() {
                println!(
                    "{:<4} {:<24} {:>7.1} {:>4} {:>4} {:>4} {:>6} {:>7.1} {:>6.0} {:>7}",
                    index + 1,
                    row.name,
                    row.points,
                    row.wins,
                    row.draws,
                    row.losses,
                    row.games_played,
                    row.win_rate,
                    row.performance_rating,
                    row.tournaments_counted,
                );
            }
            println!(
                "\n{} players across {} tournaments",
                stats.len(),
                dataset.tournaments.len()
            );
        }

        Commands::Tournaments {
            team,
            tournaments,
            month,
            name,
        } => {
            let sources = collect_config(&config, team, tournaments)?;
            let collector = build_collector(&config, sources)?;
            let opts = CollectOptions {
                filter: StatsFilter::new(month, name),
                include_games: false,
            };

            let dataset = collector
                .collect_once(&opts)
                .await
                .context("Collection pass failed")?;

            println!("{:<10} {:<8} {:<40} {:>8}", "Id", "Month", "Name", "Players");
            for t in &dataset.tournaments {
                println!(
                    "{:<10} {:<8} {:<40} {:>8}",
                    t.id,
                    t.month_key(),
                    t.full_name,
                    t.nb_players.map_or("-".to_string(), |n| n.to_string()),
                );
            }
        }

        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let sources = CollectConfig {
                team: config.team.clone(),
                tournaments: config.tournaments.clone(),
            };
            let collector = build_collector(&config, sources)?;
            let state = AppState {
                config: Arc::new(config),
                collector: Arc::new(collector),
                dataset: Arc::new(RwLock::new(None)),
            };

            let mut app = build_router(state);
            if access_log {
                app = app.layer(tower_http::trace::TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
