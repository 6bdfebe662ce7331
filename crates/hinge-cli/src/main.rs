//! Hinge CLI - Command-line interface for keyframe movers

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{simulate, validate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hinge")]
#[command(about = "Deterministic keyframe movers: doors, lifts, platforms", long_about = None)]
#[command(version)]
struct Cli {
    /// Log mover activations, arrivals and bounces
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a level file and check every mover
    Validate {
        /// Path to level file
        level: String,
    },

    /// Run a level headless and print mover state
    Simulate {
        /// Path to level file
        level: String,

        /// Number of fixed steps to run
        #[arg(long, default_value = "600")]
        ticks: u64,

        /// Print mover snapshots every K steps
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Force the legacy mover math regardless of the level setting
        #[arg(long)]
        legacy: bool,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { level } => validate::run(&level),
        Commands::Simulate {
            level,
            ticks,
            every,
            format,
            legacy,
        } => simulate::run(simulate::SimulateArgs {
            level,
            ticks,
            every,
            format,
            legacy,
        }),
    }
}
