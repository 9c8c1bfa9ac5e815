//! Scan-specific configuration and statistics
//!
//! `ScanConfig` drives one batch run over a transaction feed; `ScanStats`
//! accumulates outcome totals and timing for the final summary.

use crate::detection::DetectionConfig;
use crate::types::{ClassificationOutcome, Rule};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one scan over a transaction feed
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub feed_path: PathBuf,
    pub matches_path: PathBuf,
    pub frequency_csv_path: PathBuf,
    pub progress_interval: usize,
    pub detection: DetectionConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            feed_path: "./transactions.json".into(),
            matches_path: "./coinjoin_matches.txt".into(),
            frequency_csv_path: "./value_frequencies.csv".into(),
            progress_interval: 10_000,
            detection: DetectionConfig::default(),
        }
    }
}

/// Builder for ScanConfig with validation
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    feed_path: Option<PathBuf>,
    matches_path: Option<PathBuf>,
    frequency_csv_path: Option<PathBuf>,
    progress_interval: Option<usize>,
    detection: Option<DetectionConfig>,
}

impl ScanConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transaction feed path
    pub fn feed_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.feed_path = Some(path.into());
        self
    }

    /// Set the matched-txid output path
    pub fn matches_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.matches_path = Some(path.into());
        self
    }

    /// Set the frequency table CSV path
    pub fn frequency_csv_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.frequency_csv_path = Some(path.into());
        self
    }

    /// Set the progress reporting interval
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Set the detection thresholds
    pub fn detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = Some(detection);
        self
    }

    /// Build the configuration with validation
    pub fn build(self) -> Result<ScanConfig, String> {
        let defaults = ScanConfig::default();
        let config = ScanConfig {
            feed_path: self.feed_path.unwrap_or(defaults.feed_path),
            matches_path: self.matches_path.unwrap_or(defaults.matches_path),
            frequency_csv_path: self
                .frequency_csv_path
                .unwrap_or(defaults.frequency_csv_path),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
            detection: self.detection.unwrap_or_default(),
        };

        if config.progress_interval == 0 {
            return Err("Progress interval cannot be zero".to_string());
        }

        config.detection.validate()?;

        Ok(config)
    }
}

impl ScanConfig {
    /// Create a new builder
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }
}

/// Statistics accumulated over one scan
#[derive(Debug, Clone)]
pub struct ScanStats {
    pub total_records: u64,
    pub coinjoin_like: u64,
    pub not_coinjoin: u64,
    pub skipped_records: u64,
    /// How often each rule was the first to fail
    pub first_failure_counts: HashMap<Rule, u64>,
    pub started_at: DateTime<Utc>,
    pub processing_duration: Duration,
}

impl ScanStats {
    pub fn new() -> Self {
        Self {
            total_records: 0,
            coinjoin_like: 0,
            not_coinjoin: 0,
            skipped_records: 0,
            first_failure_counts: HashMap::new(),
            started_at: Utc::now(),
            processing_duration: Duration::ZERO,
        }
    }

    /// Record one classification outcome
    pub fn record_outcome(&mut self, outcome: &ClassificationOutcome) {
        self.total_records += 1;
        match outcome {
            ClassificationOutcome::CoinJoinLike => self.coinjoin_like += 1,
            ClassificationOutcome::NotCoinJoin { first_failed } => {
                self.not_coinjoin += 1;
                *self.first_failure_counts.entry(*first_failed).or_insert(0) += 1;
            }
            ClassificationOutcome::Skipped { .. } => self.skipped_records += 1,
        }
    }

    /// Percentage of records classified CoinJoin-like
    pub fn match_rate(&self) -> f64 {
        crate::utils::math::safe_percentage_u64(self.coinjoin_like, self.total_records)
    }

    /// Percentage of records skipped as malformed
    pub fn skip_rate(&self) -> f64 {
        crate::utils::math::safe_percentage_u64(self.skipped_records, self.total_records)
    }

    /// Records per second over the whole scan
    pub fn processing_rate(&self) -> f64 {
        let secs = self.processing_duration.as_secs_f64();
        if secs > 0.0 {
            self.total_records as f64 / secs
        } else {
            0.0
        }
    }

    /// First-failure breakdown in rule order, skipping rules that never failed
    pub fn failure_breakdown(&self) -> Vec<(Rule, u64)> {
        Rule::ALL
            .iter()
            .filter_map(|rule| {
                self.first_failure_counts
                    .get(rule)
                    .map(|count| (*rule, *count))
            })
            .collect()
    }

    /// Finalise timing
    pub fn finish(&mut self) {
        self.processing_duration = (Utc::now() - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_zero_progress_interval() {
        let result = ScanConfig::builder().progress_interval(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = ScanConfig::builder()
            .feed_path("/tmp/feed.json")
            .build()
            .unwrap();
        assert_eq!(config.feed_path, PathBuf::from("/tmp/feed.json"));
        assert_eq!(config.progress_interval, 10_000);
        assert_eq!(config.detection.min_inputs, 3);
    }

    #[test]
    fn test_stats_outcome_accounting() {
        let mut stats = ScanStats::new();
        stats.record_outcome(&ClassificationOutcome::CoinJoinLike);
        stats.record_outcome(&ClassificationOutcome::NotCoinJoin {
            first_failed: Rule::MinInputs,
        });
        stats.record_outcome(&ClassificationOutcome::NotCoinJoin {
            first_failed: Rule::MinInputs,
        });
        stats.record_outcome(&ClassificationOutcome::Skipped {
            reason: "missing output list".to_string(),
        });

        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.coinjoin_like, 1);
        assert_eq!(stats.not_coinjoin, 2);
        assert_eq!(stats.skipped_records, 1);
        assert_eq!(stats.match_rate(), 25.0);
        assert_eq!(stats.failure_breakdown(), vec![(Rule::MinInputs, 2)]);
    }
}
