//! Value Frequency Analyzer
//!
//! Groups a transaction's outputs by value and ranks the distinct values by
//! descending frequency. The ranking feeds the repeated-output-value rule and
//! is what gets persisted to the frequency table, so the order must be fully
//! deterministic: ties on count are broken by descending value.

use crate::types::{FrequencyEntry, TxOutput};
use std::collections::HashMap;

/// Rank distinct output values by descending frequency, ties broken by
/// descending value, truncated to `top` entries.
///
/// Pure function of the output list; reordering the outputs does not change
/// the result. Fewer than `top` distinct values yields a shorter ranking
/// with no padding; an empty output list yields an empty ranking.
pub fn rank_output_values(outputs: &[TxOutput], top: usize) -> Vec<FrequencyEntry> {
    let mut counts: HashMap<u64, u32> = HashMap::new();
    for output in outputs {
        *counts.entry(output.value).or_insert(0) += 1;
    }

    let mut ranked: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry { value, count })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(b.value.cmp(&a.value)));
    ranked.truncate(top);
    ranked
}
