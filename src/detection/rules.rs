//! The seven detection rules
//!
//! Each rule is a total pure function of the relevant transaction slice plus
//! the detection config, returning a [`RuleVerdict`] with a diagnostic
//! message naming the measured quantity. No rule panics on empty lists or
//! missing addresses; absent addresses act as wildcards that never compare
//! equal to anything, including each other.

use crate::detection::DetectionConfig;
use crate::types::{FrequencyEntry, Rule, RuleVerdict, TxInput, TxOutput};
use std::collections::HashSet;

/// R1: at least `min_inputs` inputs
pub fn min_inputs(inputs: &[TxInput], config: &DetectionConfig) -> RuleVerdict {
    let measured = format!("inputs={}, required>={}", inputs.len(), config.min_inputs);
    if inputs.len() >= config.min_inputs {
        RuleVerdict::pass(Rule::MinInputs, measured)
    } else {
        RuleVerdict::fail(Rule::MinInputs, measured)
    }
}

/// R2: output count must scale with input count
///
/// Below `small_fanout_cutoff` outputs, the output count must reach the input
/// count; at or above the cutoff, half the input count (rounded up) suffices.
/// Zero outputs always fails.
pub fn sufficient_outputs(
    inputs: &[TxInput],
    outputs: &[TxOutput],
    config: &DetectionConfig,
) -> RuleVerdict {
    if outputs.is_empty() {
        return RuleVerdict::fail(
            Rule::SufficientOutputs,
            format!("outputs=0, inputs={}", inputs.len()),
        );
    }

    let required = if outputs.len() < config.small_fanout_cutoff {
        inputs.len()
    } else {
        inputs.len().div_ceil(2)
    };

    let measured = format!(
        "outputs={}, inputs={}, required>={}",
        outputs.len(),
        inputs.len(),
        required
    );
    if outputs.len() >= required {
        RuleVerdict::pass(Rule::SufficientOutputs, measured)
    } else {
        RuleVerdict::fail(Rule::SufficientOutputs, measured)
    }
}

/// R3: at least one top-ranked output value reaches the adaptive frequency
/// threshold
///
/// `ranking` is the analyzer output for these outputs; the classifier computes
/// it once so the same ranking can be persisted to the frequency sink.
pub fn repeated_output_value(
    outputs: &[TxOutput],
    ranking: &[FrequencyEntry],
    config: &DetectionConfig,
) -> RuleVerdict {
    if outputs.len() < config.min_outputs_for_value_analysis {
        return RuleVerdict::fail(
            Rule::RepeatedOutputValue,
            format!(
                "outputs={}, required>={} for value analysis",
                outputs.len(),
                config.min_outputs_for_value_analysis
            ),
        );
    }

    let threshold = config.frequency_threshold(outputs.len());
    // Ranking is count-descending, so the first entry is the best candidate
    match ranking.first() {
        Some(best) if best.count >= threshold => RuleVerdict::pass(
            Rule::RepeatedOutputValue,
            format!(
                "value {} appears {} times, threshold={}",
                best.value, best.count, threshold
            ),
        ),
        Some(best) => RuleVerdict::fail(
            Rule::RepeatedOutputValue,
            format!(
                "no value reaches threshold {} (best: {} appears {} times)",
                threshold, best.value, best.count
            ),
        ),
        None => RuleVerdict::fail(
            Rule::RepeatedOutputValue,
            format!("empty value ranking, threshold={}", threshold),
        ),
    }
}

/// R4: all present destination addresses are pairwise distinct
pub fn unique_output_addresses(outputs: &[TxOutput]) -> RuleVerdict {
    let mut seen: HashSet<&str> = HashSet::new();
    for output in outputs {
        if let Some(address) = output.address.as_deref() {
            if !seen.insert(address) {
                return RuleVerdict::fail(
                    Rule::UniqueOutputAddresses,
                    format!("output address {} reused", address),
                );
            }
        }
    }
    RuleVerdict::pass(
        Rule::UniqueOutputAddresses,
        format!("{} distinct output addresses", seen.len()),
    )
}

/// R5: output count within `max_output_factor` times the input count
///
/// Equality passes: `outputs == factor * inputs` is still a reasonable shape.
pub fn reasonable_output_count(
    inputs: &[TxInput],
    outputs: &[TxOutput],
    config: &DetectionConfig,
) -> RuleVerdict {
    let limit = config.max_output_factor * inputs.len();
    let measured = format!(
        "outputs={}, limit<={} ({}x{} inputs)",
        outputs.len(),
        limit,
        config.max_output_factor,
        inputs.len()
    );
    if outputs.len() <= limit {
        RuleVerdict::pass(Rule::ReasonableOutputCount, measured)
    } else {
        RuleVerdict::fail(Rule::ReasonableOutputCount, measured)
    }
}

/// R6: no zero-value data-carrier (OP_RETURN) output
pub fn no_zero_op_return(outputs: &[TxOutput]) -> RuleVerdict {
    for (index, output) in outputs.iter().enumerate() {
        if output.is_data_carrier() && output.value == 0 {
            return RuleVerdict::fail(
                Rule::NoZeroOpReturn,
                format!("zero-value data-carrier output at index {}", index),
            );
        }
    }
    RuleVerdict::pass(Rule::NoZeroOpReturn, "no zero-value data-carrier outputs")
}

/// R7: inputs are not all from a single address
///
/// Fails only when every input carries an address and they are all identical;
/// any absent address is a wildcard distinct from every other input, so a
/// partially- or fully-unattributed input set passes.
pub fn unique_input_addresses(inputs: &[TxInput]) -> RuleVerdict {
    if inputs.len() < 2 {
        return RuleVerdict::pass(
            Rule::UniqueInputAddresses,
            format!("inputs={}, single-owner check not applicable", inputs.len()),
        );
    }

    let mut addresses = inputs.iter().map(|input| input.address.as_deref());
    let first = match addresses.next().flatten() {
        Some(addr) => addr,
        None => {
            return RuleVerdict::pass(
                Rule::UniqueInputAddresses,
                "input address unknown, treated as distinct",
            )
        }
    };

    if addresses.all(|addr| addr == Some(first)) {
        RuleVerdict::fail(
            Rule::UniqueInputAddresses,
            format!("all {} input addresses identical ({})", inputs.len(), first),
        )
    } else {
        RuleVerdict::pass(Rule::UniqueInputAddresses, "input addresses not all identical")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::rank_output_values;

    fn input(address: Option<&str>) -> TxInput {
        TxInput {
            address: address.map(str::to_string),
        }
    }

    fn output(value: u64, address: Option<&str>, script_type: &str) -> TxOutput {
        TxOutput {
            value,
            address: address.map(str::to_string),
            script_type: script_type.to_string(),
        }
    }

    fn plain_outputs(values: &[u64]) -> Vec<TxOutput> {
        values
            .iter()
            .map(|&v| output(v, None, "pubkeyhash"))
            .collect()
    }

    fn config() -> DetectionConfig {
        DetectionConfig::default()
    }

    #[test]
    fn test_r1_boundary() {
        let two = vec![input(None), input(None)];
        let three = vec![input(None), input(None), input(None)];
        assert!(!min_inputs(&two, &config()).passed);
        assert!(min_inputs(&three, &config()).passed);
        assert!(!min_inputs(&[], &config()).passed);
    }

    #[test]
    fn test_r1_message_names_measured_quantity() {
        let verdict = min_inputs(&[input(None)], &config());
        assert_eq!(verdict.message, "inputs=1, required>=3");
    }

    #[test]
    fn test_r2_small_fanout_requires_full_input_count() {
        let inputs = vec![input(None); 4];
        assert!(!sufficient_outputs(&inputs, &plain_outputs(&[1, 2, 3]), &config()).passed);
        assert!(sufficient_outputs(&inputs, &plain_outputs(&[1, 2, 3, 4]), &config()).passed);
    }

    #[test]
    fn test_r2_large_fanout_requires_half_input_count() {
        // 64 outputs crosses the cutoff, so 100 inputs only need 50 outputs
        let inputs = vec![input(None); 100];
        let outputs = plain_outputs(&(0..64).collect::<Vec<u64>>());
        assert!(sufficient_outputs(&inputs, &outputs, &config()).passed);

        // Below the cutoff, 63 outputs fall back to the full-count requirement
        let outputs = plain_outputs(&(0..63).collect::<Vec<u64>>());
        assert!(!sufficient_outputs(&inputs, &outputs, &config()).passed);
    }

    #[test]
    fn test_r2_zero_outputs_fails_without_panicking() {
        let inputs = vec![input(None); 3];
        assert!(!sufficient_outputs(&inputs, &[], &config()).passed);
    }

    #[test]
    fn test_r2_monotonic_in_output_count() {
        // Increasing outputs while holding inputs fixed never turns pass into fail
        let inputs = vec![input(None); 10];
        let mut previous_passed = false;
        for n in 0..140 {
            let outputs = plain_outputs(&(0..n).collect::<Vec<u64>>());
            let passed = sufficient_outputs(&inputs, &outputs, &config()).passed;
            assert!(passed || !previous_passed, "regressed at {} outputs", n);
            previous_passed = passed;
        }
    }

    #[test]
    fn test_r3_threshold_met() {
        let outputs = plain_outputs(&[1000, 1000, 1000, 2000]);
        let ranking = rank_output_values(&outputs, 5);
        let verdict = repeated_output_value(&outputs, &ranking, &config());
        assert!(verdict.passed);
        assert!(verdict.message.contains("1000"));
    }

    #[test]
    fn test_r3_threshold_not_met() {
        let outputs = plain_outputs(&[1000, 1000, 2000, 3000]);
        let ranking = rank_output_values(&outputs, 5);
        // threshold for 4 outputs is 3; best count is 2
        assert!(!repeated_output_value(&outputs, &ranking, &config()).passed);
    }

    #[test]
    fn test_r3_insufficient_outputs_for_analysis() {
        let outputs = plain_outputs(&[1000, 1000]);
        let ranking = rank_output_values(&outputs, 5);
        let verdict = repeated_output_value(&outputs, &ranking, &config());
        assert!(!verdict.passed);
        assert!(verdict.message.contains("value analysis"));
    }

    #[test]
    fn test_r4_distinct_addresses_pass() {
        let outputs = vec![
            output(1, Some("a"), "pubkeyhash"),
            output(2, Some("b"), "pubkeyhash"),
        ];
        assert!(unique_output_addresses(&outputs).passed);
    }

    #[test]
    fn test_r4_reused_address_fails() {
        let outputs = vec![
            output(1, Some("a"), "pubkeyhash"),
            output(2, Some("a"), "pubkeyhash"),
        ];
        let verdict = unique_output_addresses(&outputs);
        assert!(!verdict.passed);
        assert!(verdict.message.contains('a'));
    }

    #[test]
    fn test_r4_absent_addresses_never_collide() {
        let outputs = vec![
            output(1, None, "nulldata"),
            output(2, None, "nulldata"),
            output(3, Some("a"), "pubkeyhash"),
        ];
        assert!(unique_output_addresses(&outputs).passed);
    }

    #[test]
    fn test_r5_equality_passes_and_one_more_fails() {
        let inputs = vec![input(None); 3];
        assert!(
            reasonable_output_count(&inputs, &plain_outputs(&[0, 1, 2, 3, 4, 5]), &config())
                .passed
        );
        assert!(
            !reasonable_output_count(&inputs, &plain_outputs(&[0, 1, 2, 3, 4, 5, 6]), &config())
                .passed
        );
    }

    #[test]
    fn test_r6_zero_value_data_carrier_fails() {
        let outputs = vec![
            output(1000, Some("a"), "pubkeyhash"),
            output(0, None, "nulldata"),
        ];
        assert!(!no_zero_op_return(&outputs).passed);
    }

    #[test]
    fn test_r6_nonzero_data_carrier_passes() {
        let outputs = vec![output(5, None, "nulldata")];
        assert!(no_zero_op_return(&outputs).passed);
    }

    #[test]
    fn test_r6_zero_value_standard_output_passes() {
        let outputs = vec![output(0, Some("a"), "pubkeyhash")];
        assert!(no_zero_op_return(&outputs).passed);
    }

    #[test]
    fn test_r7_all_identical_fails() {
        let inputs = vec![input(Some("owner")), input(Some("owner")), input(Some("owner"))];
        let verdict = unique_input_addresses(&inputs);
        assert!(!verdict.passed);
        assert!(verdict.message.contains("owner"));
    }

    #[test]
    fn test_r7_distinct_addresses_pass() {
        let inputs = vec![input(Some("a")), input(Some("b")), input(Some("a"))];
        assert!(unique_input_addresses(&inputs).passed);
    }

    #[test]
    fn test_r7_absent_addresses_are_wildcards() {
        // Two unknown inputs must never count as "same address"
        let all_unknown = vec![input(None), input(None), input(None)];
        assert!(unique_input_addresses(&all_unknown).passed);

        // One unknown among identical addresses breaks the single-owner claim
        let mixed = vec![input(Some("a")), input(Some("a")), input(None)];
        assert!(unique_input_addresses(&mixed).passed);
    }
}
