//! Append-only record of compiled evidence files.
//!
//! The ledger is a CSV file with the header `filename,hash,timestamp,status` and one row per
//! compiled file. Its set of `filename` values is the dedup state the compiler consults at the
//! start of every run. Rows are only ever appended here; clearing the ledger is an out-of-band
//! operation.

use crate::{
    error::MindseyeError,
    properties::{ContentFingerprint, LedgerEntry, STATUS_PROCESSED},
};
use chrono::NaiveDateTime;
use std::{
    collections::BTreeSet,
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

pub const LEDGER_HEADER: [&str; 4] = ["filename", "hash", "timestamp", "status"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Ledger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The set of relative paths already compiled.
    ///
    /// A missing ledger is a first run. A ledger that cannot be opened, or whose header has no
    /// `filename` column, is logged and treated the same way; it never fails the caller.
    pub fn load(&self) -> BTreeSet<String> {
        if !self.exists() {
            tracing::debug!("[Ledger] No ledger at {:?}; starting empty", self.path);
            return BTreeSet::new();
        }
        match self.read_filenames() {
            Ok(set) => {
                tracing::info!(
                    "[Ledger] Loaded {} previously processed files",
                    set.len()
                );
                set
            }
            Err(e) => {
                tracing::warn!(
                    "[Ledger] Could not load processed files log {:?}: {}",
                    self.path,
                    e
                );
                BTreeSet::new()
            }
        }
    }

    /// Only a missing `filename` column is fatal. Short, long or unreadable rows are logged and
    /// skipped so the rows around them still count.
    fn read_filenames(&self) -> Result<BTreeSet<String>, MindseyeError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let Some(idx) = headers.iter().position(|h| h == LEDGER_HEADER[0]) else {
            return Err(MindseyeError::Ledger(format!(
                "missing '{}' column in header {:?}",
                LEDGER_HEADER[0], headers
            )));
        };
        let mut set = BTreeSet::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("[Ledger] Skipping unreadable row in {:?}: {}", self.path, e);
                    continue;
                }
            };
            match record.get(idx).filter(|name| !name.is_empty()) {
                Some(filename) => {
                    set.insert(filename.to_string());
                }
                None => tracing::warn!(
                    "[Ledger] Skipping row {:?} with no '{}' value",
                    record.position().map(|p| p.line()),
                    LEDGER_HEADER[0]
                ),
            }
        }
        Ok(set)
    }

    /// Every row in ledger order, for audit display.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, MindseyeError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = Vec::new();
        for row in reader.deserialize() {
            let entry: LedgerEntry = row?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Append one row, writing the header first if the file is new or empty.
    pub fn record(
        &self,
        relative_path: &str,
        fingerprint: &ContentFingerprint,
        timestamp: NaiveDateTime,
    ) -> Result<LedgerEntry, MindseyeError> {
        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let entry = LedgerEntry {
            relative_path: relative_path.to_string(),
            fingerprint: fingerprint.to_string(),
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            status: STATUS_PROCESSED.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(LEDGER_HEADER)?;
        }
        writer.write_record([
            entry.relative_path.as_str(),
            entry.fingerprint.as_str(),
            entry.timestamp.as_str(),
            entry.status.as_str(),
        ])?;
        writer.flush()?;
        tracing::debug!("[Ledger] Recorded {}", entry.relative_path);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fingerprint::fingerprint_bytes;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use test_log::test;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 14)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn test_missing_ledger_is_empty() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("compiler_log.csv"));
        assert!(ledger.load().is_empty());
        assert!(ledger.entries().unwrap().is_empty());
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("compiler_log.csv");
        let ledger = Ledger::new(&path);

        let fp = fingerprint_bytes(b"a");
        ledger.record("a.txt", &fp, at(9, 30, 0)).unwrap();
        ledger
            .record("docs/b.md", &fingerprint_bytes(b"b"), at(9, 30, 1))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "filename,hash,timestamp,status");
        assert_eq!(
            lines[1],
            format!("a.txt,{},2025-02-14 09:30:00,processed", fp.as_str())
        );

        let reopened = Ledger::new(&path);
        let set = reopened.load();
        assert_eq!(set.len(), 2);
        assert!(set.contains("a.txt"));
        assert!(set.contains("docs/b.md"));

        let entries = reopened.entries().unwrap();
        assert_eq!(entries[1].relative_path, "docs/b.md");
        assert_eq!(entries[1].timestamp, "2025-02-14 09:30:01");
        assert_eq!(entries[1].status, "processed");
    }

    #[test]
    fn test_paths_with_commas_round_trip() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("log.csv"));
        ledger
            .record("odd, name.txt", &fingerprint_bytes(b"x"), at(0, 0, 0))
            .unwrap();
        assert!(ledger.load().contains("odd, name.txt"));
    }

    #[test]
    fn test_malformed_ledger_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compiler_log.csv");
        fs::write(&path, "name,when\nx.txt,today\n").unwrap();
        let ledger = Ledger::new(&path);
        assert!(ledger.load().is_empty());
        assert!(ledger.entries().is_err());
    }

    #[test]
    fn test_short_and_torn_rows_keep_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compiler_log.csv");
        let ledger = Ledger::new(&path);
        ledger
            .record("a.txt", &fingerprint_bytes(b"a"), at(1, 0, 0))
            .unwrap();
        ledger
            .record("b.txt", &fingerprint_bytes(b"b"), at(1, 0, 1))
            .unwrap();

        let mut text = fs::read_to_string(&path).unwrap();
        text.push_str("d.txt,abc\n");
        text.push_str(",,,\n");
        fs::write(&path, &text).unwrap();
        ledger
            .record("c.txt", &fingerprint_bytes(b"c"), at(1, 0, 2))
            .unwrap();

        let set = ledger.load();
        let expected: BTreeSet<String> = ["a.txt", "b.txt", "c.txt", "d.txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compiler_log.csv");
        fs::write(&path, "").unwrap();
        let ledger = Ledger::new(&path);
        ledger
            .record("a.txt", &fingerprint_bytes(b"a"), at(1, 2, 3))
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("filename,hash,timestamp,status"));
        assert_eq!(ledger.load().len(), 1);
    }
}
