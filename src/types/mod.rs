//! Shared types for the detection pipeline

pub mod classification;
pub mod common;
pub mod scan;

pub use classification::{
    ClassificationOutcome, ClassificationResult, FrequencyEntry, FrequencyRecord, Rule,
    RuleVerdict,
};
pub use common::{
    RawInput, RawOutput, RawScriptPubKey, RawTransaction, Transaction, TxEnvelope, TxInput,
    TxOutput, NULLDATA_TYPE,
};
pub use scan::{ScanConfig, ScanConfigBuilder, ScanStats};
