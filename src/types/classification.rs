//! Classification result types
//!
//! Verdicts produced by individual rules, the aggregated per-transaction
//! outcome, and the frequency records persisted for transactions that reach
//! the repeated-output-value rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven detection rules, in their fixed evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rule {
    MinInputs,
    SufficientOutputs,
    RepeatedOutputValue,
    UniqueOutputAddresses,
    ReasonableOutputCount,
    NoZeroOpReturn,
    UniqueInputAddresses,
}

impl Rule {
    /// All rules in evaluation order
    pub const ALL: [Rule; 7] = [
        Rule::MinInputs,
        Rule::SufficientOutputs,
        Rule::RepeatedOutputValue,
        Rule::UniqueOutputAddresses,
        Rule::ReasonableOutputCount,
        Rule::NoZeroOpReturn,
        Rule::UniqueInputAddresses,
    ];

    /// Stable diagnostic name
    pub fn name(&self) -> &'static str {
        match self {
            Rule::MinInputs => "min-inputs",
            Rule::SufficientOutputs => "sufficient-outputs",
            Rule::RepeatedOutputValue => "repeated-output-value",
            Rule::UniqueOutputAddresses => "unique-output-addresses",
            Rule::ReasonableOutputCount => "reasonable-output-count",
            Rule::NoZeroOpReturn => "no-zero-op-return",
            Rule::UniqueInputAddresses => "unique-input-addresses",
        }
    }

    /// One-based position in the evaluation order (R1..R7)
    pub fn number(&self) -> usize {
        Rule::ALL
            .iter()
            .position(|r| r == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{} {}", self.number(), self.name())
    }
}

/// Result of evaluating one rule against one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    pub rule: Rule,
    pub passed: bool,
    /// Diagnostic describing the measured quantity, e.g. "inputs=2, required>=3"
    pub message: String,
}

impl RuleVerdict {
    pub fn pass(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            passed: false,
            message: message.into(),
        }
    }
}

/// Aggregated per-transaction classification outcome
///
/// `Skipped` marks malformed records; it is a distinct outcome, never counted
/// as a pass or a fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    CoinJoinLike,
    NotCoinJoin { first_failed: Rule },
    Skipped { reason: String },
}

impl ClassificationOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ClassificationOutcome::CoinJoinLike)
    }
}

/// Full classification of one transaction: the outcome, the structured
/// verdict stream of every rule that was evaluated, and the frequency record
/// when the repeated-output-value rule was reached
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub txid: String,
    pub outcome: ClassificationOutcome,
    pub verdicts: Vec<RuleVerdict>,
    pub frequency: Option<FrequencyRecord>,
}

/// One (value, count) entry of a frequency ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Output value in satoshis
    pub value: u64,
    /// Number of outputs carrying that value
    pub count: u32,
}

/// Top-ranked output values for one transaction, descending by count then by
/// value, at most five entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub txid: String,
    pub entries: Vec<FrequencyEntry>,
}
