//! Text cards for command results.
//!
//! Each card is a `=== title ===` header followed by labelled rows grouped
//! into sections, rendered to a `String` so callers choose where it goes.

use std::path::Path;

use chrono::NaiveDate;
use yachaq_core::{BracketTable, ComputationResult};
use yachaq_eval::{ChunkAudit, EvalMetrics, YearHistogram};

const LABEL_WIDTH: usize = 26;

// ── Rule engine ──

pub fn import_taxes_card(result: &ComputationResult) -> String {
    let mut card = Card::new("Import taxes");
    card.row("base (CIF)", money(result.base));
    card.section("Taxes");
    for (name, amount) in result.taxes.iter() {
        card.row(name, money(amount));
    }
    card.section("Total");
    card.row("total", money(result.total));
    card.finish()
}

pub fn income_tax_card(amount: f64, table: &BracketTable, liability: f64) -> String {
    let mut card = Card::new("Income tax");
    card.row("taxable income", money(amount));
    card.row("brackets", table.brackets().len());
    if let Some(bracket) = table
        .brackets()
        .iter()
        .rev()
        .find(|b| amount >= b.lower_limit)
    {
        card.row("applied lower limit", money(bracket.lower_limit));
        card.row("applied rate", bracket.rate);
        card.row("applied fixed fee", money(bracket.fixed_fee));
    }
    card.section("Liability");
    card.row("liability", money(liability));
    card.finish()
}

pub fn working_day_card(start: NaiveDate, days: i64, holidays: usize, due: NaiveDate) -> String {
    let mut card = Card::new("Working days");
    card.row("start", start);
    card.row("business days", days);
    card.row("holidays considered", holidays);
    card.row("due", format!("{due} ({})", due.format("%A")));
    card.finish()
}

// ── Datasets ──

pub fn audit_card(path: &Path, audit: &ChunkAudit, max_failures: usize) -> String {
    let mut card = Card::new(&format!("Chunk audit: {}", path.display()));
    card.row("records", audit.total);
    card.row("valid", audit.valid);
    card.row("invalid", audit.invalid);

    if !audit.failures.is_empty() {
        card.section("Failures");
        for failure in audit.failures.iter().take(max_failures) {
            card.row(&format!("line {}", failure.line), failure.errors.join("; "));
        }
        if audit.failures.len() > max_failures {
            card.line(&format!("... and {} more", audit.failures.len() - max_failures));
        }

        card.section("Most common errors");
        for (message, count) in audit.top_errors() {
            card.row(&count.to_string(), message);
        }
    }
    card.finish()
}

pub fn metrics_card(path: &Path, metrics: &EvalMetrics) -> String {
    let mut card = Card::new(&format!("Evaluation: {}", path.display()));
    card.row("answers", metrics.count);
    card.row("citation accuracy", percent(metrics.citation_accuracy));
    card.row("hallucination rate", percent(metrics.hallucination_rate));
    card.row("freshness coverage", percent(metrics.freshness_coverage));
    card.finish()
}

/// Tab-separated year report, one block per file.
pub fn years_report(path: &Path, histogram: &YearHistogram, skipped: usize) -> String {
    let path = path.display();
    let mut out = format!("{path}\ttotal={}\n", histogram.total);
    if skipped > 0 {
        out.push_str(&format!("{path}\tskipped={skipped}\n"));
    }
    for (year, count) in histogram.rows() {
        out.push_str(&format!("{path}\t{year}\t{count}\n"));
    }
    out.push('\n');
    out
}

// ── Helpers ──

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

struct Card {
    out: String,
}

impl Card {
    fn new(title: &str) -> Self {
        Self {
            out: format!("=== {title} ===\n"),
        }
    }

    fn section(&mut self, header: &str) {
        self.out.push_str(&format!("\n{header}\n"));
    }

    fn row(&mut self, label: &str, value: impl std::fmt::Display) {
        self.out
            .push_str(&format!("  {:<width$} {}\n", label, value, width = LABEL_WIDTH));
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(&format!("  {text}\n"));
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yachaq_core::{ImportTaxRates, compute_import_taxes};
    use yachaq_eval::{JsonlRecord, audit_chunks};

    #[test]
    fn import_card_lists_all_four_taxes() {
        let result = compute_import_taxes(1000.0, &ImportTaxRates::default()).unwrap();
        let card = import_taxes_card(&result);
        assert!(card.starts_with("=== Import taxes ===\n"));
        for name in ["ad_valorem", "fodinfa", "ice", "iva"] {
            assert!(card.contains(name), "missing {name} in:\n{card}");
        }
        assert!(card.contains("1000.00"));
    }

    #[test]
    fn income_card_names_applied_bracket() {
        let table = BracketTable::new(vec![
            (0.0, 0.0, 0.0).into(),
            (11722.0, 0.15, 0.0).into(),
            (14948.0, 0.20, 484.0).into(),
        ])
        .unwrap();
        let card = income_tax_card(15000.0, &table, 494.4);
        assert!(card.contains("14948.00"));
        assert!(card.contains("494.40"));
    }

    #[test]
    fn working_day_card_shows_weekday() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
        let card = working_day_card(start, 2, 1, due);
        assert!(card.contains("2025-10-14 (Tuesday)"));
    }

    #[test]
    fn audit_card_truncates_failures() {
        let records: Vec<JsonlRecord> = (1..=3)
            .map(|line| JsonlRecord {
                line,
                value: json!({"url": ""}),
            })
            .collect();
        let audit = audit_chunks(&records);
        let card = audit_card(Path::new("chunks.jsonl"), &audit, 2);
        assert!(card.contains("line 1"));
        assert!(card.contains("line 2"));
        assert!(!card.contains("line 3"));
        assert!(card.contains("... and 1 more"));
    }

    #[test]
    fn years_report_is_tab_separated() {
        let records = vec![json!({"ro_date": "2024-01-01"}), json!({})];
        let hist = YearHistogram::from_records(&records);
        let report = years_report(Path::new("a.jsonl"), &hist, 0);
        assert_eq!(report, "a.jsonl\ttotal=2\na.jsonl\tunknown\t1\na.jsonl\t2024\t1\n\n");
    }
}
