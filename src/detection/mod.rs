//! CoinJoin-likeness detection engine
//!
//! Seven structural rules evaluated in fixed order over a transaction's
//! inputs and outputs, plus the value-frequency analyzer backing the
//! repeated-output-value rule and the sink that persists its rankings.

use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod frequency;
pub mod rules;
pub mod sink;

pub use classifier::Classifier;
pub use frequency::rank_output_values;
pub use sink::{CsvFrequencySink, FrequencySink, NullFrequencySink};

/// Thresholds driving the detection rules
///
/// Passed once into the [`Classifier`] at construction; rules themselves
/// stay pure functions of (transaction data, config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// R1: minimum number of inputs
    pub min_inputs: usize,
    /// R5: outputs may not exceed this multiple of the input count
    pub max_output_factor: usize,
    /// R2: below this output count, outputs must match the input count;
    /// at or above it, half the input count suffices
    pub small_fanout_cutoff: usize,
    /// R3: minimum outputs before value analysis is meaningful
    pub min_outputs_for_value_analysis: usize,
    /// R3: lower clamp bound for the adaptive frequency threshold
    pub frequency_threshold_floor: u32,
    /// R3: upper clamp bound for the adaptive frequency threshold
    pub frequency_threshold_cap: u32,
    /// Number of top-ranked values kept per transaction
    pub top_values: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_inputs: 3,
            max_output_factor: 2,
            small_fanout_cutoff: 64,
            min_outputs_for_value_analysis: 3,
            frequency_threshold_floor: 3,
            frequency_threshold_cap: 5,
            top_values: 5,
        }
    }
}

impl DetectionConfig {
    /// Validate the current configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_inputs == 0 {
            return Err("min_inputs cannot be zero".to_string());
        }
        if self.max_output_factor == 0 {
            return Err("max_output_factor cannot be zero".to_string());
        }
        if self.frequency_threshold_floor == 0 {
            return Err("frequency_threshold_floor cannot be zero".to_string());
        }
        if self.frequency_threshold_floor > self.frequency_threshold_cap {
            return Err(format!(
                "frequency_threshold_floor ({}) cannot exceed frequency_threshold_cap ({})",
                self.frequency_threshold_floor, self.frequency_threshold_cap
            ));
        }
        if self.top_values == 0 {
            return Err("top_values cannot be zero".to_string());
        }
        Ok(())
    }

    /// Adaptive frequency threshold for R3: `clamp(floor(log2(n)) + 1, floor, cap)`
    ///
    /// `output_count` must be non-zero; callers guard via
    /// `min_outputs_for_value_analysis`.
    pub fn frequency_threshold(&self, output_count: usize) -> u32 {
        let adaptive = output_count.max(1).ilog2() + 1;
        adaptive.clamp(self.frequency_threshold_floor, self.frequency_threshold_cap)
    }
}
