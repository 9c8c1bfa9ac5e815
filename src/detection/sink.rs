//! Frequency record sinks
//!
//! The classifier persists value-frequency rankings through this seam rather
//! than holding a concrete file handle. The CSV implementation backs the
//! frequency table export; the null implementation serves callers that only
//! want the classification (single-transaction inspection, tests).

use crate::errors::AppResult;
use crate::types::FrequencyRecord;
use std::fs::File;
use std::path::Path;

/// Destination for per-transaction value-frequency rankings
///
/// Append-only; rows are written in transaction processing order and are
/// never deduplicated.
pub trait FrequencySink {
    /// Append one transaction's ranking
    fn record(&mut self, record: &FrequencyRecord) -> AppResult<()>;

    /// Flush any buffered rows
    fn flush(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// CSV-backed sink writing `txid,rank,value,count` rows with a header
pub struct CsvFrequencySink {
    writer: csv::Writer<File>,
}

impl CsvFrequencySink {
    /// Create the CSV file and write the header row
    pub fn create<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["txid", "rank", "value", "count"])?;
        Ok(Self { writer })
    }
}

impl FrequencySink for CsvFrequencySink {
    fn record(&mut self, record: &FrequencyRecord) -> AppResult<()> {
        for (index, entry) in record.entries.iter().enumerate() {
            self.writer.write_record([
                record.txid.as_str(),
                &(index + 1).to_string(),
                &entry.value.to_string(),
                &entry.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that discards all records
#[derive(Debug, Default)]
pub struct NullFrequencySink;

impl FrequencySink for NullFrequencySink {
    fn record(&mut self, _record: &FrequencyRecord) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrequencyEntry;
    use std::io::Read;

    fn record(txid: &str, entries: &[(u64, u32)]) -> FrequencyRecord {
        FrequencyRecord {
            txid: txid.to_string(),
            entries: entries
                .iter()
                .map(|&(value, count)| FrequencyEntry { value, count })
                .collect(),
        }
    }

    #[test]
    fn test_csv_sink_writes_header_and_ranked_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq.csv");

        let mut sink = CsvFrequencySink::create(&path).unwrap();
        sink.record(&record("tx1", &[(1000, 3), (2000, 1)])).unwrap();
        sink.record(&record("tx2", &[(500, 2)])).unwrap();
        sink.flush().unwrap();

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "txid,rank,value,count",
                "tx1,1,1000,3",
                "tx1,2,2000,1",
                "tx2,1,500,2",
            ]
        );
    }

    #[test]
    fn test_csv_sink_appends_nothing_for_empty_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq.csv");

        let mut sink = CsvFrequencySink::create(&path).unwrap();
        sink.record(&record("tx-empty", &[])).unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1); // header only
    }

    #[test]
    fn test_null_sink_accepts_records() {
        let mut sink = NullFrequencySink;
        assert!(sink.record(&record("tx1", &[(1, 1)])).is_ok());
        assert!(sink.flush().is_ok());
    }
}
