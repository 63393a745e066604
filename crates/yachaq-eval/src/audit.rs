//! Contract audit over a batch of chunk metadata records.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use yachaq_core::validate_chunk_metadata;

use crate::JsonlRecord;

pub const NOT_AN_OBJECT: &str = "record is not a JSON object";

/// Validation errors for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkFailure {
    pub line: usize,
    pub errors: Vec<String>,
}

/// Summary of validating every record in a dataset.
#[derive(Debug, Default, Serialize)]
pub struct ChunkAudit {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub failures: Vec<ChunkFailure>,
    /// error message → number of records reporting it
    pub error_counts: BTreeMap<String, usize>,
}

impl ChunkAudit {
    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }

    /// Error messages ordered by frequency, most common first.
    pub fn top_errors(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .error_counts
            .iter()
            .map(|(msg, count)| (msg.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }
}

/// Validate each record independently and tally the results.
pub fn audit_chunks(records: &[JsonlRecord]) -> ChunkAudit {
    let mut audit = ChunkAudit::default();

    for record in records {
        audit.total += 1;
        let errors = match &record.value {
            Value::Object(map) => validate_chunk_metadata(map),
            _ => vec![NOT_AN_OBJECT.to_string()],
        };
        if errors.is_empty() {
            audit.valid += 1;
            continue;
        }

        audit.invalid += 1;
        for err in &errors {
            *audit.error_counts.entry(err.clone()).or_default() += 1;
        }
        audit.failures.push(ChunkFailure {
            line: record.line,
            errors,
        });
    }

    info!(
        total = audit.total,
        valid = audit.valid,
        invalid = audit.invalid,
        "chunk audit complete"
    );
    audit
}
