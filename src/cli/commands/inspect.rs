use crate::config::AppConfig;
use crate::detection::{Classifier, NullFrequencySink};
use crate::errors::{AppError, AppResult};
use crate::processor::feed;
use crate::types::ClassificationOutcome;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct InspectCommand {
    /// Path to the JSON transaction feed (overrides config.toml and env vars)
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Transaction id to classify
    #[arg(long)]
    txid: String,
}

impl InspectCommand {
    pub fn run(&self) -> AppResult<()> {
        let app_config = AppConfig::get_defaults();
        let feed_path = self.feed.clone().unwrap_or(app_config.paths.feed);

        let records = feed::load_feed_values(&feed_path)?;
        let classifier = Classifier::new(app_config.detection);

        for (index, value) in records.into_iter().enumerate() {
            let raw = match feed::decode_record(value, index) {
                Ok(raw) => raw,
                Err(_) => continue,
            };
            if raw.txid.as_deref() != Some(self.txid.as_str()) {
                continue;
            }

            let tx = raw.into_transaction(index)?;
            let result = classifier.classify(&tx, &mut NullFrequencySink)?;

            println!("Transaction: {}", tx.txid);
            println!(
                "  Inputs: {}  Outputs: {}",
                tx.inputs.len(),
                tx.outputs.len()
            );
            println!();
            for verdict in &result.verdicts {
                let status = if verdict.passed { "pass" } else { "FAIL" };
                println!(
                    "  [{}] {:<28} {}",
                    status,
                    verdict.rule.to_string(),
                    verdict.message
                );
            }
            println!();
            match result.outcome {
                ClassificationOutcome::CoinJoinLike => println!("Verdict: CoinJoin-like"),
                ClassificationOutcome::NotCoinJoin { first_failed } => {
                    println!("Verdict: not CoinJoin (first failing rule: {})", first_failed)
                }
                ClassificationOutcome::Skipped { reason } => {
                    println!("Verdict: skipped ({})", reason)
                }
            }
            if let Some(frequency) = result.frequency {
                println!();
                println!("Top output values:");
                for (rank, entry) in frequency.entries.iter().enumerate() {
                    println!(
                        "  #{} value={} count={}",
                        rank + 1,
                        entry.value,
                        entry.count
                    );
                }
            }
            return Ok(());
        }

        Err(AppError::InvalidData(format!(
            "Transaction {} not found in feed {}",
            self.txid,
            feed_path.display()
        )))
    }
}
