//! cricket-xi CLI
//!
//! Commands:
//! - `cricket-xi serve` - Run the HTTP API
//! - `cricket-xi select` - Pick a Best XI from the command line
//! - `cricket-xi aggregate` - Show per-player aggregates for a format
//! - `cricket-xi check-config` - Validate configuration

pub mod output;
pub mod runtime;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::adapters::start_api_server_with_shutdown;
use crate::api::types::TeamResponse;
use crate::config::AppConfig;
use crate::domain::{parse_match_format, PlayerAggregate, SelectedTeam};
use output::OutputMode;
pub use runtime::build_state;

/// Cricket stats backend and Best XI selector
#[derive(Parser, Debug)]
#[command(name = "cricket-xi")]
#[command(author, version, about = "Cricket performance stats and Best XI selection")]
pub struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, global = true, default_value = "config", env = "CRICKET_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Pick a Best XI for the given conditions
    Select {
        #[arg(short, long, default_value = "ODI")]
        format: String,
        #[arg(short, long)]
        pitch: String,
        /// Defaults to the most common weather in the data
        #[arg(short, long)]
        weather: Option<String>,
        #[arg(short, long)]
        opposition: String,
        #[arg(long)]
        json: bool,
    },

    /// Show per-player aggregates for a format
    Aggregate {
        #[arg(short, long, default_value = "ODI")]
        format: String,
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and exit
    CheckConfig,
}

#[derive(Debug, Serialize, Tabled)]
struct TeamRow {
    #[tabled(rename = "#")]
    pos: usize,
    name: String,
    role: String,
    player_type: String,
    score: String,
    backfilled: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct AggregateRow {
    name: String,
    role: String,
    bowling: String,
    matches: usize,
    runs: String,
    strike_rate: String,
    wickets: String,
    economy: String,
}

impl From<&PlayerAggregate> for AggregateRow {
    fn from(p: &PlayerAggregate) -> Self {
        Self {
            name: p.name.clone(),
            role: p.role.to_string(),
            bowling: p.bowling_style.to_string(),
            matches: p.matches,
            runs: format!("{:.1}", p.avg_runs),
            strike_rate: format!("{:.1}", p.avg_strike_rate),
            wickets: format!("{:.2}", p.avg_wickets),
            economy: format!("{:.2}", p.avg_economy),
        }
    }
}

fn team_rows(team: &SelectedTeam) -> Vec<TeamRow> {
    team.slots
        .iter()
        .enumerate()
        .map(|(i, slot)| TeamRow {
            pos: i + 1,
            name: slot.player.name().to_string(),
            role: slot.assigned_role.to_string(),
            player_type: slot.player.role().to_string(),
            score: format!("{:.2}", slot.player.predicted_score),
            backfilled: slot.backfilled,
        })
        .collect()
}

impl Cli {
    pub async fn run(self, config: AppConfig) -> Result<()> {
        match self.command {
            Commands::Serve { host, port } => {
                let mut config = config;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                if let Err(errors) = config.validate() {
                    bail!("invalid configuration: {}", errors.join("; "));
                }
                let addr = config.bind_addr()?;
                let state = build_state(&config).await?;
                info!(%addr, "Starting cricket-xi API");
                start_api_server_with_shutdown(state, addr, shutdown_signal()).await?;
                Ok(())
            }
            Commands::Select {
                format,
                pitch,
                weather,
                opposition,
                json,
            } => {
                let format = parse_match_format(&format)?;
                let state = build_state(&config).await?;
                let team = state
                    .select_best_xi(format, &pitch, weather.as_deref().unwrap_or_default(), &opposition)
                    .await
                    .with_context(|| format!("selecting {format} Best XI"))?;

                match OutputMode::from_json_flag(json) {
                    OutputMode::Json => output::print_json(&TeamResponse::from(team))?,
                    OutputMode::Table => {
                        println!(
                            "{} Best XI vs {} ({}, {})",
                            format, team.context.opposition, team.context.pitch_type, team.context.weather
                        );
                        output::print_items(&team_rows(&team), OutputMode::Table)?;
                        if let Some(warning) = &team.warning {
                            println!("warning: {warning}");
                        }
                        for skip in &team.skipped {
                            println!("skipped {}: {}", skip.name, skip.reason);
                        }
                    }
                }
                Ok(())
            }
            Commands::Aggregate { format, json } => {
                let format = parse_match_format(&format)?;
                let state = build_state(&config).await?;
                let snapshot = state.snapshot().await;
                let aggregates = snapshot.get_aggregates(format, state.selector.roster());
                let mode = OutputMode::from_json_flag(json);
                match mode {
                    OutputMode::Json => output::print_json(&aggregates)?,
                    OutputMode::Table => {
                        let rows: Vec<AggregateRow> = aggregates.iter().map(AggregateRow::from).collect();
                        output::print_items(&rows, mode)?;
                    }
                }
                Ok(())
            }
            Commands::CheckConfig => match config.validate() {
                Ok(()) => {
                    config.build_selector()?;
                    println!("Configuration OK");
                    Ok(())
                }
                Err(errors) => {
                    for e in &errors {
                        println!("  - {e}");
                    }
                    bail!("{} configuration problem(s)", errors.len())
                }
            },
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
