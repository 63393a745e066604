//! Provenance contract for retrievable text chunks.
//!
//! Every chunk in the knowledge base carries a flat metadata record that ties
//! it back to its publication in the Registro Oficial (the official gazette):
//! issue number, issue date, article locator, issuing authority, validity date
//! and a canonical URL.
//!
//! Records arrive from noisy scraped sources, so validation never fails
//! outright. All checks run and every problem is reported as a human-readable
//! message; an empty list means the record is accepted.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::UnknownAuthority;

/// A chunk metadata record: field name to scalar value.
pub type ChunkMetadata = Map<String, Value>;

/// Keys every chunk metadata record must carry.
pub const REQUIRED_KEYS: [&str; 8] = [
    "source",
    "title",
    "ro_number",
    "ro_date",
    "article",
    "authority",
    "vigency",
    "url",
];

/// Class of the body that issued a legal provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    Constitution,
    OrganicLaw,
    Law,
    Regulation,
    Resolution,
    Circular,
}

impl Authority {
    pub const ALL: [Authority; 6] = [
        Authority::Constitution,
        Authority::OrganicLaw,
        Authority::Law,
        Authority::Regulation,
        Authority::Resolution,
        Authority::Circular,
    ];

    /// Canonical lower-case name as it appears in metadata records.
    pub fn as_str(self) -> &'static str {
        match self {
            Authority::Constitution => "constitution",
            Authority::OrganicLaw => "organic law",
            Authority::Law => "law",
            Authority::Regulation => "regulation",
            Authority::Resolution => "resolution",
            Authority::Circular => "circular",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = UnknownAuthority;

    /// Matches after trimming whitespace, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| UnknownAuthority(s.to_string()))
    }
}

/// Validate a chunk metadata record.
///
/// Returns one message per failed check, in a fixed order: key completeness,
/// URL, gazette number, authority, gazette date, vigency date.
pub fn validate_chunk_metadata(record: &ChunkMetadata) -> Vec<String> {
    let mut diagnostics = Diagnostics::default();

    let mut missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !record.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        let listed: Vec<String> = missing.iter().map(|key| format!("'{key}'")).collect();
        diagnostics.push(format!("missing keys: [{}]", listed.join(", ")));
    }

    let url = field_text(record, "url");
    if url.is_empty() {
        diagnostics.push("url is empty");
    } else if !is_absolute_url(&url) {
        diagnostics.push("url is not absolute");
    }

    if field_text(record, "ro_number").trim().is_empty() {
        diagnostics.push("ro_number is empty");
    }

    let authority = field_text(record, "authority");
    if !authority.trim().is_empty()
        && let Err(err) = authority.parse::<Authority>()
    {
        diagnostics.push(err.to_string());
    }

    check_date(&mut diagnostics, record, "ro_date");
    check_date(&mut diagnostics, record, "vigency");

    let errors = diagnostics.finish();
    if !errors.is_empty() {
        debug!(
            errors = errors.len(),
            url = %url,
            "chunk metadata failed validation"
        );
    }
    errors
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Rejects unpadded fields, surrounding whitespace and year zero.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| date.year() >= 1)
}

/// String form of a field value; absent and `null` read as empty.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Whether a field value counts as unset: absent, `null`, `false`, zero, or
/// an empty string, array or object.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
    }
}

// ── Checks ──

/// Ordered collector for validation messages.
#[derive(Debug, Default)]
struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    fn finish(self) -> Vec<String> {
        self.messages
    }
}

fn check_date(diagnostics: &mut Diagnostics, record: &ChunkMetadata, key: &str) {
    if is_blank(record.get(key)) {
        diagnostics.push(format!("{key} is empty"));
    } else if parse_iso_date(&field_text(record, key)).is_none() {
        diagnostics.push(format!("{key} must be YYYY-MM-DD"));
    }
}

/// Scheme plus an explicit `//authority`. The WHATWG parser supplies a host
/// for `https:example.com`, so the `//` is checked on the raw text.
fn is_absolute_url(raw: &str) -> bool {
    let raw = raw.trim_start_matches(|c: char| c <= ' ');
    Url::parse(raw).is_ok_and(|url| {
        let after_scheme = raw.get(url.scheme().len() + 1..);
        !url.scheme().is_empty()
            && url.has_host()
            && after_scheme.is_some_and(|rest| rest.starts_with("//"))
    })
}

fn field_text(record: &ChunkMetadata, key: &str) -> String {
    value_text(record.get(key))
}
