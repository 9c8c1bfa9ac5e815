//! The classifier: ordered rule evaluation with short-circuiting
//!
//! Runs R1..R7 in fixed numeric order and stops at the first failing rule.
//! When R3 is reached, the value-frequency ranking is persisted to the
//! injected sink before R3's own verdict is computed, so the frequency table
//! carries every transaction that was evaluated against R3 regardless of how
//! that rule (or any later rule) came out. Transactions failing R1 or R2
//! never reach R3 and leave no frequency rows.

use crate::detection::{frequency, rules, DetectionConfig, FrequencySink};
use crate::errors::AppResult;
use crate::types::{
    ClassificationOutcome, ClassificationResult, FrequencyRecord, Rule, RuleVerdict, Transaction,
};
use tracing::debug;

/// CoinJoin-likeness classifier over a fixed rule pipeline
pub struct Classifier {
    config: DetectionConfig,
}

impl Classifier {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify one transaction, persisting its frequency ranking to `sink`
    /// if rule R3 is reached
    pub fn classify(
        &self,
        tx: &Transaction,
        sink: &mut dyn FrequencySink,
    ) -> AppResult<ClassificationResult> {
        let mut verdicts: Vec<RuleVerdict> = Vec::with_capacity(Rule::ALL.len());
        let mut frequency_record: Option<FrequencyRecord> = None;

        for rule in Rule::ALL {
            let verdict = match rule {
                Rule::MinInputs => rules::min_inputs(&tx.inputs, &self.config),
                Rule::SufficientOutputs => {
                    rules::sufficient_outputs(&tx.inputs, &tx.outputs, &self.config)
                }
                Rule::RepeatedOutputValue => {
                    let ranking =
                        frequency::rank_output_values(&tx.outputs, self.config.top_values);
                    let record = FrequencyRecord {
                        txid: tx.txid.clone(),
                        entries: ranking.clone(),
                    };
                    sink.record(&record)?;
                    frequency_record = Some(record);
                    rules::repeated_output_value(&tx.outputs, &ranking, &self.config)
                }
                Rule::UniqueOutputAddresses => rules::unique_output_addresses(&tx.outputs),
                Rule::ReasonableOutputCount => {
                    rules::reasonable_output_count(&tx.inputs, &tx.outputs, &self.config)
                }
                Rule::NoZeroOpReturn => rules::no_zero_op_return(&tx.outputs),
                Rule::UniqueInputAddresses => rules::unique_input_addresses(&tx.inputs),
            };

            debug!(
                txid = %tx.txid,
                rule = %verdict.rule,
                passed = verdict.passed,
                "{}",
                verdict.message
            );

            let failed = !verdict.passed;
            verdicts.push(verdict);

            if failed {
                return Ok(ClassificationResult {
                    txid: tx.txid.clone(),
                    outcome: ClassificationOutcome::NotCoinJoin { first_failed: rule },
                    verdicts,
                    frequency: frequency_record,
                });
            }
        }

        debug!(txid = %tx.txid, "all rules passed, CoinJoin-like");
        Ok(ClassificationResult {
            txid: tx.txid.clone(),
            outcome: ClassificationOutcome::CoinJoinLike,
            verdicts,
            frequency: frequency_record,
        })
    }
}
