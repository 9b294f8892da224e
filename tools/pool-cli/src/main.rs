//! Race Prediction Pool CLI
//!
//! Operator commands over the pool's data directory:
//! - submit: store a participant's picks for an upcoming event
//! - leaderboard: rank every prediction for one event
//! - score: slot-by-slot breakdown for one participant
//! - standings: season table across all scheduled events

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use pool_engine::LeaderboardOutcome;
use pool_store::UpsertOutcome;
use std::path::PathBuf;
use tracing::info;

mod config;
mod display;
mod logging;
mod pool;

use pool::Pool;

#[derive(Parser)]
#[command(name = "pool")]
#[command(about = "Race prediction pool: submit picks, score events, build standings")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit or replace a participant's prediction for an event
    Submit {
        #[arg(short, long)]
        participant: String,

        #[arg(short, long)]
        event: String,

        /// Predicted finishers in order, comma separated; leave a slot empty to skip it
        #[arg(long, value_delimiter = ',')]
        picks: Vec<String>,
    },

    /// Show the leaderboard for one event
    Leaderboard {
        #[arg(short, long)]
        event: String,
    },

    /// Show one participant's per-slot score for an event
    Score {
        #[arg(short, long)]
        participant: String,

        #[arg(short, long)]
        event: String,
    },

    /// Show the season standings
    Standings {
        /// Also print running points totals per event
        #[arg(long)]
        cumulative: bool,
    },

    /// List the season schedule
    Schedule,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }

    logging::initialize_logging(&config.logging.level, &config.logging.format)?;
    info!("Using data directory {:?}", config.store.data_dir);

    let pool = Pool::open(&config.store, config.scoring.clone()).await?;

    match cli.command {
        Commands::Submit { participant, event, picks } => {
            let outcome = pool.submit(&participant, &event, &picks, Utc::now()).await?;
            match outcome {
                UpsertOutcome::Inserted => {
                    println!("{} Prediction stored for {} at {}", "✅".green(), participant, event)
                }
                UpsertOutcome::Replaced => {
                    println!("{} Prediction replaced for {} at {}", "✅".green(), participant, event)
                }
            }
        }
        Commands::Leaderboard { event } => match pool.leaderboard(&event).await? {
            LeaderboardOutcome::Available(board) => display::print_leaderboard(&board),
            LeaderboardOutcome::Unavailable { event_id } => {
                println!("{} No official result for {} yet", "⏳".yellow(), event_id)
            }
        },
        Commands::Score { participant, event } => {
            let outcome = pool.leaderboard(&event).await?;
            let Some(board) = outcome.leaderboard() else {
                println!("{} No official result for {} yet", "⏳".yellow(), event);
                return Ok(());
            };
            match board.score_for(&participant) {
                Some(score) => display::print_event_score(score, pool.max_event_score()),
                None => bail!("{participant} has no prediction for {event}"),
            }
        }
        Commands::Standings { cumulative } => {
            let standings = pool.standings().await?;
            display::print_standings(&standings, cumulative);
        }
        Commands::Schedule => {
            let now = Utc::now();
            let next = pool.next_open(now).map(|event| event.round);
            for event in pool.schedule().events() {
                let status = if next == Some(event.round) {
                    "next".yellow().bold()
                } else if event.is_open(now, pool.lock_grace()) {
                    "open".green()
                } else {
                    "locked".red()
                };
                let starts = event
                    .starts_at
                    .map(|start| start.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "TBA".to_string());
                println!("{:>3}  {:<32} {:<22} {}", event.round, event.event_id, starts, status);
            }
        }
    }

    Ok(())
}
