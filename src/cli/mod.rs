use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use goldpulse::config::Config;

pub mod commands;

#[derive(Parser)]
#[command(
    name = "goldpulse",
    about = "Daily gold market snapshots, summaries and sentiment layers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the rolling window of daily snapshots from collector output
    Snapshots {
        /// Treat this date as today (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Render every snapshot into a plain-text summary
    Summaries,

    /// Snapshots followed by summaries
    Run {
        /// Treat this date as today (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Build the news layer from collected headlines
    News {
        /// Headlines JSON (`{"headlines": [...]}`)
        #[arg(short, long)]
        input: PathBuf,

        /// Reference time for the timeframe windows (e.g. 2024-06-01T08:00:00)
        #[arg(short, long)]
        now: Option<NaiveDateTime>,
    },

    /// Build the social layer from collected posts
    Social {
        /// Posts JSON (`{"posts": [...]}`)
        #[arg(short, long)]
        input: PathBuf,

        /// Reference time for the timeframe windows (e.g. 2024-06-01T08:00:00)
        #[arg(short, long)]
        now: Option<NaiveDateTime>,
    },
}

/// Execute CLI command with the loaded configuration
pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Snapshots { date } => {
            config.as_of_date = date;
            info!("Building daily snapshots");
            commands::snapshots(config)?;
        }
        Commands::Summaries => {
            info!("Converting snapshots to summaries");
            commands::summaries(config)?;
        }
        Commands::Run { date } => {
            config.as_of_date = date;
            info!("Running snapshot and summary pipeline");
            commands::snapshots(config.clone())?;
            commands::summaries(config)?;
        }
        Commands::News { input, now } => {
            config.as_of_time = now;
            info!(input = %input.display(), "Building news layer");
            commands::news(config, &input)?;
        }
        Commands::Social { input, now } => {
            config.as_of_time = now;
            info!(input = %input.display(), "Building social layer");
            commands::social(config, &input).await?;
        }
    }
    Ok(())
}
