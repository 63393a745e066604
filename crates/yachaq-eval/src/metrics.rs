//! Citation and freshness metrics for generated answers.
//!
//! Each evaluation record is a model answer annotated with the `citations`
//! it gave and a `valid_as_of` date when the answer states legal validity.

use serde::Serialize;
use serde_json::Value;
use yachaq_core::{is_blank, value_text};

/// Fields a citation needs to point back at a gazette publication.
pub const CITATION_FIELDS: [&str; 4] = ["source", "ro_number", "article", "url"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EvalMetrics {
    pub count: f64,
    /// Share of answers whose citations are all complete.
    pub citation_accuracy: f64,
    /// Share of answers with no citations or at least one incomplete one.
    pub hallucination_rate: f64,
    /// Share of answers stating a validity date.
    pub freshness_coverage: f64,
}

/// A citation is valid when every [`CITATION_FIELDS`] entry is present and
/// non-blank after trimming.
pub fn has_valid_citation(citation: &Value) -> bool {
    let Value::Object(fields) = citation else {
        return false;
    };
    CITATION_FIELDS
        .iter()
        .all(|field| !value_text(fields.get(*field)).trim().is_empty())
}

pub fn evaluate_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> EvalMetrics {
    let mut total = 0usize;
    let mut citation_hits = 0usize;
    let mut hallucinations = 0usize;
    let mut freshness_hits = 0usize;

    for record in records {
        total += 1;

        let citations = record
            .get("citations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if !citations.is_empty() && citations.iter().all(has_valid_citation) {
            citation_hits += 1;
        } else {
            hallucinations += 1;
        }

        if !is_blank(record.get("valid_as_of")) {
            freshness_hits += 1;
        }
    }

    if total == 0 {
        return EvalMetrics::default();
    }

    let total_f = total as f64;
    EvalMetrics {
        count: total_f,
        citation_accuracy: citation_hits as f64 / total_f,
        hallucination_rate: hallucinations as f64 / total_f,
        freshness_coverage: freshness_hits as f64 / total_f,
    }
}
