//! pitwall - race strategy simulator CLI

#![deny(clippy::unwrap_used)]

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pitwall_core::config::PlannedStop;
use pitwall_core::TireCompound;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pitwall")]
#[command(about = "Pit wall strategy simulator - run stints, call stops, beat the reference")]
#[command(version)]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List circuits and tire compounds
    Tracks,

    /// Print the reference strategy's lap-by-lap cumulative times
    Reference {
        #[arg(long, env = "PITWALL_TRACK", default_value = "SILVERSTONE")]
        track: String,
    },

    /// Simulate a whole race instantly with automated strategists
    Race {
        #[arg(long, env = "PITWALL_TRACK", default_value = "SILVERSTONE")]
        track: String,

        /// Starting compound (SOFT, MEDIUM, HARD or S/M/H)
        #[arg(long, default_value = "MEDIUM")]
        tire: TireCompound,

        #[arg(long, value_enum, default_value_t = StrategyChoice::All)]
        strategy: StrategyChoice,

        /// Lap to box before, for the one-stop strategy
        #[arg(long)]
        stop_lap: Option<u32>,

        /// Compound fitted by the one-stop strategy
        #[arg(long, default_value = "MEDIUM")]
        stop_tire: TireCompound,
    },

    /// Run a race live on a timer, executing a planned set of stops
    Run {
        /// JSON settings file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, env = "PITWALL_TRACK")]
        track: Option<String>,

        #[arg(long)]
        tire: Option<TireCompound>,

        /// Box before a lap, e.g. --pit 12:HARD (repeatable)
        #[arg(long = "pit", value_name = "LAP:TIRE")]
        pit: Vec<PlannedStop>,

        /// Milliseconds per lap, clamped to 100..=2000
        #[arg(long, env = "PITWALL_TICK_MS")]
        interval_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    NoStop,
    OneStop,
    GripWatch,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pitwall_cli={log_level},pitwall_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::Tracks => commands::tracks(cli.json),
        Commands::Reference { track } => commands::reference(&track, cli.json),
        Commands::Race {
            track,
            tire,
            strategy,
            stop_lap,
            stop_tire,
        } => commands::race(&track, tire, strategy, stop_lap, stop_tire, cli.json),
        Commands::Run {
            config,
            track,
            tire,
            pit,
            interval_ms,
        } => {
            let overrides = commands::RunOverrides {
                track,
                tire,
                pit,
                interval_ms,
            };
            commands::run(config.as_deref(), overrides, cli.json).await
        }
    };

    if let Err(e) = &result {
        if cli.json {
            output::print_error_json(e);
        } else {
            output::print_error_human(e);
        }
        std::process::exit(1);
    }
    Ok(())
}
