use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_stats::api::state::AppState;
use roster_stats::cache::SystemClock;
use roster_stats::config::AppConfig;
use roster_stats::fetch::HenrikClient;
use roster_stats::refresh::{RefreshSettings, RosterController};

#[derive(Parser)]
#[command(name = "roster-stats")]
#[command(about = "Valorant roster tracker with cached match stats")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server and the background refresher
    Serve {
        /// Bind address (defaults to [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to [server].port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Refresh the roster once and print the team summary
    Refresh,

    /// Print ranked and scrim stats for one roster member
    Player {
        /// Riot name
        name: String,

        /// Riot tag, without the leading '#'
        tag: String,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_controller(config: &AppConfig) -> Result<Arc<RosterController>> {
    let api_key = config.resolve_api_key()?;
    let client = HenrikClient::new(&config.upstream, &config.region, &api_key)
        .context("Failed to build upstream client")?;

    Ok(Arc::new(RosterController::new(
        config.roster.clone(),
        Arc::new(client),
        Arc::new(SystemClock),
        RefreshSettings::from_config(config),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting roster-stats v{}", env!("CARGO_PKG_VERSION"));

    let controller = build_controller(&config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if config.refresher.enabled {
                if let Some(every) = roster_stats::parse_duration(&config.refresher.interval) {
                    tracing::info!("Background refresh every {}", config.refresher.interval);
                    let _refresher = controller.spawn_refresher(every);
                }
            }

            let state = AppState::new(controller, config.server.cors_origin.clone());
            let app = roster_stats::api::build_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Refresh => {
            let summary = controller.team_summary().await;
            let report = controller.last_report().await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if !report.failures.is_empty() {
                eprintln!("\nFailures:");
                for failure in &report.failures {
                    eprintln!("  - {} ({:?}): {}", failure.player, failure.stage, failure.error);
                }
            }
        }
        Commands::Player { name, tag } => {
            let detail = controller.player_detail(&name, &tag).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
    }

    Ok(())
}
