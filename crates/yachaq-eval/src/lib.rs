//! Dataset tooling over JSONL files: loading, contract audits, answer metrics, year coverage.

mod error;
pub use error::EvalError;

pub mod audit;
pub mod jsonl;
pub mod metrics;
pub mod years;

pub use audit::{ChunkAudit, ChunkFailure, audit_chunks};
pub use jsonl::{JsonlRecord, JsonlScan, load_jsonl, scan_jsonl};
pub use metrics::{EvalMetrics, evaluate_records, has_valid_citation};
pub use years::{DATE_KEYS, UNKNOWN_YEAR, YearHistogram};
