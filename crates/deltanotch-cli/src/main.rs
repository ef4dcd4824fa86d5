//! Delta-Notch CLI - run phenotype scenarios from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deltanotch")]
#[command(author, version, about = "Delta-Notch phenotype classification and target-area growth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default deltanotch.toml scenario
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Run a scenario to its end time
    Run {
        /// Scenario file (default: nearest deltanotch.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the recorded snapshots as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Step cells sequentially instead of on the thread pool
        #[arg(long)]
        serial: bool,
    },

    /// Classify a single Delta level
    Classify {
        /// Delta level
        #[arg(allow_negative_numbers = true)]
        delta: f64,
    },

    /// Show the target-area and cell-cycle parameters of a scenario
    Params {
        /// Scenario file (default: nearest deltanotch.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { config, output, serial } => {
            commands::run::run(config.as_deref(), output.as_deref(), serial, cli.verbose)
        }
        Commands::Classify { delta } => commands::classify::run(delta),
        Commands::Params { config } => commands::params::run(config.as_deref()),
    }
}
