use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// CoinJoin-like Transaction Detector
#[derive(Parser)]
#[command(name = "coinjoin-scanner")]
#[command(about = "CoinJoin-like Transaction Detector")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a transaction feed and report CoinJoin-like transactions
    Scan(commands::scan::ScanCommand),
    /// Classify one transaction from a feed and print its rule-by-rule verdicts
    Inspect(commands::inspect::InspectCommand),
}

pub fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "info" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(command) => command.run(),
        Commands::Inspect(command) => command.run(),
    }
}
