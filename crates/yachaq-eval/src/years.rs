//! Publication-year coverage of a metadata dataset.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use yachaq_core::{is_blank, value_text};

/// Date keys consulted in order; the first one present on a record wins.
pub const DATE_KEYS: [&str; 4] = ["ro_date", "issue_date", "date", "crawl_date"];

pub const UNKNOWN_YEAR: &str = "unknown";

#[derive(Debug, Default, Serialize)]
pub struct YearHistogram {
    pub total: usize,
    /// year (first four characters of the date) → record count
    pub counts: BTreeMap<String, usize>,
}

impl YearHistogram {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut histogram = Self::default();
        for record in records {
            histogram.total += 1;
            *histogram.counts.entry(year_of(record)).or_default() += 1;
        }
        histogram
    }

    /// `(year, count)` rows, latest year first.
    pub fn rows(&self) -> Vec<(&str, usize)> {
        self.counts
            .iter()
            .rev()
            .map(|(year, count)| (year.as_str(), *count))
            .collect()
    }
}

fn year_of(record: &Value) -> String {
    let Value::Object(fields) = record else {
        return UNKNOWN_YEAR.to_string();
    };
    // A present-but-empty key still wins over later keys.
    let value = DATE_KEYS.iter().find_map(|key| fields.get(*key));
    if is_blank(value) {
        return UNKNOWN_YEAR.to_string();
    }
    value_text(value).chars().take(4).collect()
}
