//! Transaction feed decoding
//!
//! The feed is a JSON file holding either a single transaction, a single
//! RPC envelope (`{"result": {...}}`), or an array of either. The file is
//! decoded as a whole, but individual records are converted lazily so that
//! one malformed record never aborts the batch.

use crate::errors::{AppError, AppResult};
use crate::types::{RawTransaction, TxEnvelope};
use std::fs;
use std::path::Path;

/// Load the feed file into per-record JSON values
pub fn load_feed_values<P: AsRef<Path>>(path: P) -> AppResult<Vec<serde_json::Value>> {
    let contents = fs::read_to_string(path.as_ref()).map_err(AppError::Io)?;
    let parsed: serde_json::Value = serde_json::from_str(&contents)?;

    match parsed {
        serde_json::Value::Array(items) => Ok(items),
        obj @ serde_json::Value::Object(_) => Ok(vec![obj]),
        other => Err(AppError::InvalidData(format!(
            "transaction feed must be a JSON object or array, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Decode one feed record, unwrapping an RPC envelope if present
pub fn decode_record(value: serde_json::Value, index: usize) -> AppResult<RawTransaction> {
    let decoded = if value.get("result").is_some() {
        serde_json::from_value::<TxEnvelope>(value).map(|envelope| envelope.result)
    } else {
        serde_json::from_value::<RawTransaction>(value)
    };

    decoded.map_err(|e| AppError::InvalidRecord {
        index,
        reason: e.to_string(),
    })
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_feed(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_array_feed() {
        let feed = write_feed(r#"[{"txid": "a"}, {"txid": "b"}]"#);
        let values = load_feed_values(feed.path()).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_load_single_object_feed() {
        let feed = write_feed(r#"{"txid": "a", "vin": [], "vout": []}"#);
        let values = load_feed_values(feed.path()).unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_reject_scalar_feed() {
        let feed = write_feed("42");
        assert!(load_feed_values(feed.path()).is_err());
    }

    #[test]
    fn test_decode_bare_record() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"txid": "bare", "vin": [], "vout": []}"#).unwrap();
        let raw = decode_record(value, 0).unwrap();
        assert_eq!(raw.txid.as_deref(), Some("bare"));
    }

    #[test]
    fn test_decode_envelope_record() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"result": {"txid": "wrapped", "vin": [], "vout": []}}"#)
                .unwrap();
        let raw = decode_record(value, 0).unwrap();
        assert_eq!(raw.txid.as_deref(), Some("wrapped"));
    }

    #[test]
    fn test_decode_error_names_record_index() {
        let value: serde_json::Value = serde_json::from_str(r#"{"vin": "not-a-list"}"#).unwrap();
        let err = decode_record(value, 9).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { index: 9, .. }));
    }
}
