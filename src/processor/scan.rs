//! Scan driver: feed file in, matches and frequency table out
//!
//! Reads the transaction feed one record at a time, hands each decoded
//! transaction to the classifier, appends matched txids to the matches file
//! and frequency rankings to the CSV sink. Malformed records are counted and
//! skipped without aborting the batch.

use super::{feed, ProgressReporter, StandardProgressTracker};
use crate::detection::{Classifier, CsvFrequencySink, FrequencySink};
use crate::errors::{AppError, AppResult};
use crate::types::{ClassificationOutcome, ScanConfig, ScanStats};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

/// Batch processor running the full scan pipeline
pub struct ScanProcessor {
    config: ScanConfig,
    classifier: Classifier,
    progress_tracker: StandardProgressTracker,
}

impl ScanProcessor {
    /// Create a new scan processor
    pub fn new(config: ScanConfig) -> AppResult<Self> {
        config.detection.validate().map_err(AppError::Config)?;

        let classifier = Classifier::new(config.detection.clone());

        info!("Scan processor initialised");
        info!("Feed: {}", config.feed_path.display());
        info!("Matches output: {}", config.matches_path.display());
        info!("Frequency CSV: {}", config.frequency_csv_path.display());

        Ok(Self {
            config,
            classifier,
            progress_tracker: StandardProgressTracker::new(),
        })
    }

    /// Run the scan over the configured feed
    pub fn run(&mut self) -> AppResult<ScanStats> {
        let mut stats = ScanStats::new();

        let records = feed::load_feed_values(&self.config.feed_path)?;
        let total = records.len();
        info!("Loaded {} transactions for analysis", total);

        let matches_file = File::create(&self.config.matches_path).map_err(AppError::Io)?;
        let mut matches_writer = BufWriter::new(matches_file);
        let mut frequency_sink = CsvFrequencySink::create(&self.config.frequency_csv_path)?;

        self.progress_tracker.start();

        for (index, value) in records.into_iter().enumerate() {
            let outcome = match feed::decode_record(value, index)
                .and_then(|raw| raw.into_transaction(index))
            {
                Ok(tx) => {
                    let result = self.classifier.classify(&tx, &mut frequency_sink)?;
                    if result.outcome.is_match() {
                        info!("CoinJoin-like transaction detected: txid={}", tx.txid);
                        writeln!(matches_writer, "{}", tx.txid).map_err(AppError::Io)?;
                    }
                    result.outcome
                }
                Err(e) => {
                    warn!("Skipping record {}: {}", index, e);
                    ClassificationOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };

            stats.record_outcome(&outcome);

            // Timer-driven progress updates (~500ms) to keep output clean
            if self.progress_tracker.should_report() {
                ProgressReporter::report_scan_progress(
                    &stats,
                    stats.total_records as usize,
                    Some(total),
                    self.progress_tracker.elapsed_seconds(),
                );
            }
        }

        matches_writer.flush().map_err(AppError::Io)?;
        frequency_sink.flush()?;

        stats.finish();
        ProgressReporter::finish_progress_line();
        self.log_summary(&stats);

        Ok(stats)
    }

    fn log_summary(&self, stats: &ScanStats) {
        info!("=== Scan Complete ===");
        info!("Total records: {}", stats.total_records);
        info!(
            "CoinJoin-like: {} ({:.2}%)",
            stats.coinjoin_like,
            stats.match_rate()
        );
        info!("Not CoinJoin: {}", stats.not_coinjoin);
        info!(
            "Skipped (malformed): {} ({:.2}%)",
            stats.skipped_records,
            stats.skip_rate()
        );
        info!(
            "Processing time: {}",
            ProgressReporter::format_elapsed_time(stats.processing_duration.as_secs_f64())
        );
        info!("Processing rate: {:.0} tx/sec", stats.processing_rate());

        let breakdown = stats.failure_breakdown();
        if !breakdown.is_empty() {
            info!("First-failure breakdown:");
            for (rule, count) in breakdown {
                info!("  {}: {}", rule, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_feed(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn scan(feed_json: &str) -> (ScanStats, String, String) {
        let feed = write_feed(feed_json);
        let dir = tempfile::tempdir().unwrap();
        let matches_path = dir.path().join("matches.txt");
        let csv_path = dir.path().join("freq.csv");

        let config = ScanConfig::builder()
            .feed_path(feed.path())
            .matches_path(&matches_path)
            .frequency_csv_path(&csv_path)
            .build()
            .unwrap();

        let stats = ScanProcessor::new(config).unwrap().run().unwrap();
        let matches = std::fs::read_to_string(&matches_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        (stats, matches, csv)
    }

    #[test]
    fn test_scan_counts_malformed_without_aborting() {
        let feed_json = r#"[
            {"txid": "bad1"},
            {"txid": "good", "vin": [{"address": "a"}, {"address": "b"}, {"address": "c"}],
             "vout": [
                {"value": 0.00001, "scriptPubKey": {"type": "pubkeyhash", "address": "o1"}},
                {"value": 0.00001, "scriptPubKey": {"type": "pubkeyhash", "address": "o2"}},
                {"value": 0.00001, "scriptPubKey": {"type": "pubkeyhash", "address": "o3"}}
             ]}
        ]"#;

        let (stats, matches, _) = scan(feed_json);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.skipped_records, 1);
        assert_eq!(stats.coinjoin_like, 1);
        assert_eq!(matches.trim(), "good");
    }

    #[test]
    fn test_scan_short_circuit_leaves_no_frequency_rows() {
        // One input only: fails R1, never reaches R3
        let feed_json = r#"[{"txid": "tiny", "vin": [{}], "vout": [
            {"value": 0.1, "scriptPubKey": {"type": "pubkeyhash", "address": "x"}}
        ]}]"#;

        let (stats, matches, csv) = scan(feed_json);
        assert_eq!(stats.not_coinjoin, 1);
        assert!(matches.is_empty());
        assert_eq!(csv.trim(), "txid,rank,value,count");
    }
}
