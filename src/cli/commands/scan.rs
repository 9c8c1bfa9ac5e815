use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::processor::{ProgressReporter, ScanProcessor};
use crate::types::ScanConfig;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct ScanCommand {
    /// Path to the JSON transaction feed (overrides config.toml and env vars)
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Output file for matched txids (overrides config.toml)
    #[arg(long)]
    matches_output: Option<PathBuf>,

    /// CSV file for the value-frequency table (overrides config.toml)
    #[arg(long)]
    frequency_csv: Option<PathBuf>,

    /// Progress report interval (records) (overrides config.toml)
    #[arg(long)]
    progress_interval: Option<usize>,
}

impl ScanCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== CoinJoin Scanner ===");

        let app_config = AppConfig::get_defaults();

        // CLI arguments override config values
        let config = ScanConfig::builder()
            .feed_path(self.feed.clone().unwrap_or(app_config.paths.feed))
            .matches_path(
                self.matches_output
                    .clone()
                    .unwrap_or(app_config.paths.matches_output),
            )
            .frequency_csv_path(
                self.frequency_csv
                    .clone()
                    .unwrap_or(app_config.paths.frequency_csv),
            )
            .progress_interval(
                self.progress_interval
                    .unwrap_or(app_config.processing.progress_interval),
            )
            .detection(app_config.detection)
            .build()
            .map_err(crate::errors::AppError::Config)?;

        if !config.feed_path.exists() {
            return Err(crate::errors::AppError::Config(format!(
                "Transaction feed does not exist: {}",
                config.feed_path.display()
            )));
        }

        info!("Configuration:");
        info!("  Feed: {}", config.feed_path.display());
        info!("  Matches output: {}", config.matches_path.display());
        info!("  Frequency CSV: {}", config.frequency_csv_path.display());

        let mut processor = ScanProcessor::new(config.clone())?;
        let stats = processor.run()?;

        println!("\n=== SCAN COMPLETE ===");
        println!("Total transactions analysed: {}", stats.total_records);
        println!(
            "CoinJoin-like transactions found: {} ({:.2}%)",
            stats.coinjoin_like,
            stats.match_rate()
        );
        println!("Skipped (malformed): {}", stats.skipped_records);
        println!(
            "Processing time: {}",
            ProgressReporter::format_elapsed_time(stats.processing_duration.as_secs_f64())
        );
        println!("Matches written to: {}", config.matches_path.display());
        println!(
            "Frequency table written to: {}",
            config.frequency_csv_path.display()
        );

        Ok(())
    }
}
