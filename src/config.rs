use crate::detection::DetectionConfig;
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub detection: DetectionConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON transaction feed (single object, RPC envelope, or array of either)
    pub feed: PathBuf,
    /// Output file receiving one matched txid per line
    pub matches_output: PathBuf,
    /// CSV table receiving (txid, rank, value, count) frequency rows
    pub frequency_csv: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub progress_interval: usize,
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let detection = DetectionConfig::default();
        let config = Config::builder()
            // Start with default values
            .set_default("paths.feed", "./transactions.json")?
            .set_default("paths.matches_output", "./coinjoin_matches.txt")?
            .set_default("paths.frequency_csv", "./value_frequencies.csv")?
            .set_default("processing.progress_interval", 10_000)?
            // Detection defaults
            .set_default("detection.min_inputs", detection.min_inputs as i64)?
            .set_default(
                "detection.max_output_factor",
                detection.max_output_factor as i64,
            )?
            .set_default(
                "detection.small_fanout_cutoff",
                detection.small_fanout_cutoff as i64,
            )?
            .set_default(
                "detection.min_outputs_for_value_analysis",
                detection.min_outputs_for_value_analysis as i64,
            )?
            .set_default(
                "detection.frequency_threshold_floor",
                detection.frequency_threshold_floor as i64,
            )?
            .set_default(
                "detection.frequency_threshold_cap",
                detection.frequency_threshold_cap as i64,
            )?
            .set_default("detection.top_values", detection.top_values as i64)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // COINJOIN_* env variables can override any setting
            .add_source(config::Environment::with_prefix("COINJOIN"))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Check for specific environment variables with custom names
        if let Ok(feed_path) = env::var("COINJOIN_FEED_PATH") {
            app_config.paths.feed = PathBuf::from(feed_path);
        }

        if let Ok(matches_path) = env::var("COINJOIN_MATCHES_PATH") {
            app_config.paths.matches_output = PathBuf::from(matches_path);
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Self {
        // Try to load config for defaults, but don't fail if not found
        Self::load().unwrap_or_else(|_| Self {
            paths: PathsConfig {
                feed: PathBuf::from("./transactions.json"),
                matches_output: PathBuf::from("./coinjoin_matches.txt"),
                frequency_csv: PathBuf::from("./value_frequencies.csv"),
            },
            detection: DetectionConfig::default(),
            processing: ProcessingConfig {
                progress_interval: 10_000,
            },
        })
    }
}
