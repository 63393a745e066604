//! Line-delimited JSON readers.
//!
//! Blank lines are ignored by both readers. [`load_jsonl`] fails on the first
//! malformed line; [`scan_jsonl`] counts and skips them. Lines are read as
//! bytes, so a line that is not UTF-8 is malformed rather than an I/O error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::EvalError;

/// A parsed JSON value and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonlRecord {
    pub line: usize,
    pub value: Value,
}

/// Result of a lenient read.
#[derive(Debug, Default)]
pub struct JsonlScan {
    pub records: Vec<JsonlRecord>,
    /// Non-blank lines that did not parse as JSON.
    pub skipped: usize,
}

/// Read every record, failing on the first line that is not valid JSON.
pub fn load_jsonl(path: &Path) -> Result<Vec<JsonlRecord>, EvalError> {
    let mut records = Vec::new();
    for (line, bytes) in read_lines(path)? {
        let value = serde_json::from_slice(&bytes).map_err(|source| EvalError::Json {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        records.push(JsonlRecord { line, value });
    }
    info!(path = %path.display(), count = records.len(), "loaded jsonl");
    Ok(records)
}

/// Read every parseable record, skipping malformed lines.
pub fn scan_jsonl(path: &Path) -> Result<JsonlScan, EvalError> {
    let mut scan = JsonlScan::default();
    for (line, bytes) in read_lines(path)? {
        match serde_json::from_slice(&bytes) {
            Ok(value) => scan.records.push(JsonlRecord { line, value }),
            Err(err) => {
                warn!(path = %path.display(), line, error = %err, "skipping malformed line");
                scan.skipped += 1;
            }
        }
    }
    info!(
        path = %path.display(),
        count = scan.records.len(),
        skipped = scan.skipped,
        "scanned jsonl"
    );
    Ok(scan)
}

/// Non-blank, trimmed lines paired with their 1-based line numbers.
fn read_lines(path: &Path) -> Result<Vec<(usize, Vec<u8>)>, EvalError> {
    if !path.exists() {
        return Err(EvalError::NotFound(path.to_path_buf()));
    }
    let io_err = |source| EvalError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut lines = Vec::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim_ascii();
        if !trimmed.is_empty() {
            lines.push((idx + 1, trimmed.to_vec()));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: impl AsRef<[u8]>) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_ref()).unwrap();
        file
    }

    #[test]
    fn load_skips_blank_lines_and_keeps_line_numbers() {
        let file = fixture("{\"a\": 1}\n\n   \n{\"a\": 2}\n");
        let records = load_jsonl(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].value["a"], 2);
    }

    #[test]
    fn load_fails_on_malformed_line() {
        let file = fixture("{\"a\": 1}\nnot json\n");
        let err = load_jsonl(file.path()).unwrap_err();
        match err {
            EvalError::Json { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scan_counts_malformed_lines() {
        let file = fixture("{\"a\": 1}\n{broken\n{\"a\": 3}\n");
        let scan = scan_jsonl(file.path()).unwrap();
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.skipped, 1);
        assert_eq!(scan.records[1].line, 3);
    }

    #[test]
    fn scan_skips_lines_that_are_not_utf8() {
        let file = fixture(b"{\"a\": 1}\n\xff\xfe{\"a\": 2}\n{\"a\": 3}\r\n");
        let scan = scan_jsonl(file.path()).unwrap();
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.skipped, 1);
        assert_eq!(scan.records[1].line, 3);
        assert_eq!(scan.records[1].value["a"], 3);
    }

    #[test]
    fn load_reports_non_utf8_line_as_json_error() {
        let file = fixture(b"{\"a\": 1}\n\xff\n");
        match load_jsonl(file.path()).unwrap_err() {
            EvalError::Json { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");
        assert!(matches!(load_jsonl(&path), Err(EvalError::NotFound(_))));
        assert!(matches!(scan_jsonl(&path), Err(EvalError::NotFound(_))));
    }

    #[test]
    fn empty_file_yields_no_records() {
        let file = fixture("");
        assert!(load_jsonl(file.path()).unwrap().is_empty());
    }
}
