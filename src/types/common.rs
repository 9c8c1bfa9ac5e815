//! Common types shared across the detection pipeline
//!
//! Raw serde records matching the JSON transaction feed, and the immutable
//! domain types the rule engine operates on. Conversion from raw to domain
//! happens once at the feed boundary; everything downstream works with
//! satoshi-denominated integer values.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Script type tag used for data-carrier (OP_RETURN) outputs
pub const NULLDATA_TYPE: &str = "nulldata";

const SATS_PER_BTC: f64 = 100_000_000.0;

/// RPC-style envelope wrapping a transaction record (`{"result": {...}}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxEnvelope {
    pub result: RawTransaction,
}

/// Raw transaction record as it appears in the JSON feed
///
/// All fields are optional so that decoding never fails outright; a record
/// missing its input or output list is rejected as malformed during domain
/// conversion, without aborting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    pub txid: Option<String>,
    pub vin: Option<Vec<RawInput>>,
    pub vout: Option<Vec<RawOutput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInput {
    /// Source address, when the feed carries it directly
    pub address: Option<String>,
    /// Previous output data (Bitcoin Core verbosity-2 shape)
    pub prevout: Option<RawPrevout>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrevout {
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: Option<RawScriptPubKey>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOutput {
    /// Output value in BTC, as RPC dumps encode it
    pub value: Option<f64>,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: Option<RawScriptPubKey>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScriptPubKey {
    #[serde(rename = "type")]
    pub script_type: Option<String>,
    /// Modern single-address form
    pub address: Option<String>,
    /// Legacy multi-address form; first entry wins
    pub addresses: Option<Vec<String>>,
}

impl RawScriptPubKey {
    fn primary_address(&self) -> Option<String> {
        self.address.clone().or_else(|| {
            self.addresses
                .as_ref()
                .and_then(|addrs| addrs.first().cloned())
        })
    }
}

/// A transaction under analysis - immutable once constructed
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub txid: String,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// One transaction input; the source address may be unknown
#[derive(Debug, Clone, PartialEq)]
pub struct TxInput {
    pub address: Option<String>,
}

/// One transaction output
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutput {
    /// Value in satoshis
    pub value: u64,
    /// Destination address; absent for non-standard script types
    pub address: Option<String>,
    /// Script type tag ("pubkeyhash", "nulldata", ...)
    pub script_type: String,
}

impl TxOutput {
    /// Whether this output is a data-carrier (OP_RETURN) output
    pub fn is_data_carrier(&self) -> bool {
        self.script_type == NULLDATA_TYPE
    }
}

/// Convert a BTC float amount to integer satoshis, clamping negatives to zero
fn btc_to_sats(btc: f64) -> u64 {
    if btc.is_finite() && btc > 0.0 {
        (btc * SATS_PER_BTC).round() as u64
    } else {
        0
    }
}

impl RawTransaction {
    /// Convert to a domain transaction, rejecting records that lack the
    /// required input or output lists
    pub fn into_transaction(self, index: usize) -> AppResult<Transaction> {
        let txid = self.txid.unwrap_or_else(|| "unknown".to_string());

        let vin = self.vin.ok_or_else(|| AppError::InvalidRecord {
            index,
            reason: format!("missing input list (txid={})", txid),
        })?;
        let vout = self.vout.ok_or_else(|| AppError::InvalidRecord {
            index,
            reason: format!("missing output list (txid={})", txid),
        })?;

        let inputs = vin
            .into_iter()
            .map(|raw| TxInput {
                address: raw.address.or_else(|| {
                    raw.prevout
                        .and_then(|p| p.script_pub_key)
                        .and_then(|spk| spk.primary_address())
                }),
            })
            .collect();

        let outputs = vout
            .into_iter()
            .map(|raw| {
                let spk = raw.script_pub_key.unwrap_or_default();
                TxOutput {
                    value: btc_to_sats(raw.value.unwrap_or(0.0)),
                    address: spk.primary_address(),
                    script_type: spk.script_type.unwrap_or_else(|| "unknown".to_string()),
                }
            })
            .collect();

        Ok(Transaction {
            txid,
            inputs,
            outputs,
        })
    }
}
