//! Deterministic financial and administrative rules for Ecuador.
//!
//! Import duties on a CIF value, progressive income-tax brackets and
//! business-day arithmetic. All functions are pure; invalid numeric input is
//! rejected with [`RuleError::InvalidArgument`] rather than clamped.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Business days added by [`next_working_day`] when the caller has no preference.
pub const DEFAULT_WORKING_DAYS: i64 = 5;

/// Round to cents from the exact binary value.
///
/// `2.675` is stored as `2.67499…` and rounds to `2.67`.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

// ── Import taxes ──

/// Rates applied to the CIF value of an import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportTaxRates {
    pub ad_valorem: f64,
    /// FODINFA, the child-development fund levy.
    pub fodinfa: f64,
    /// ICE, the special consumption tax.
    pub ice: f64,
    pub iva: f64,
}

impl Default for ImportTaxRates {
    fn default() -> Self {
        Self {
            ad_valorem: 0.10,
            fodinfa: 0.005,
            ice: 0.0,
            iva: 0.12,
        }
    }
}

/// Per-tax amounts, each rounded to cents. Always carries all four taxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub ad_valorem: f64,
    pub fodinfa: f64,
    pub ice: f64,
    pub iva: f64,
}

impl TaxBreakdown {
    pub const NAMES: [&'static str; 4] = ["ad_valorem", "fodinfa", "ice", "iva"];

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::NAMES.into_iter().zip([self.ad_valorem, self.fodinfa, self.ice, self.iva])
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    pub base: f64,
    pub taxes: TaxBreakdown,
    pub total: f64,
}

/// Compute Ecuadorian import taxes on a CIF value.
///
/// IVA is charged on the CIF plus the unrounded ad valorem, FODINFA and ICE
/// amounts. The total is the base plus the sum of the already-rounded taxes,
/// rounded once more.
pub fn compute_import_taxes(
    cif: f64,
    rates: &ImportTaxRates,
) -> Result<ComputationResult, RuleError> {
    require_non_negative("CIF", cif)?;

    let base = cif;
    let ad_valorem = base * rates.ad_valorem;
    let fodinfa = base * rates.fodinfa;
    let ice = base * rates.ice;
    let taxable_base = base + ad_valorem + fodinfa + ice;
    let iva = taxable_base * rates.iva;

    let taxes = TaxBreakdown {
        ad_valorem: round2(ad_valorem),
        fodinfa: round2(fodinfa),
        ice: round2(ice),
        iva: round2(iva),
    };
    let total = round2(base + taxes.sum());

    Ok(ComputationResult {
        base: round2(base),
        taxes,
        total,
    })
}

// ── Income tax ──

/// One row of a progressive tax table: income at or above `lower_limit`
/// owes `fixed_fee` plus `rate` on the excess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxBracket {
    pub lower_limit: f64,
    pub rate: f64,
    pub fixed_fee: f64,
}

impl From<(f64, f64, f64)> for IncomeTaxBracket {
    fn from((lower_limit, rate, fixed_fee): (f64, f64, f64)) -> Self {
        Self {
            lower_limit,
            rate,
            fixed_fee,
        }
    }
}

/// Income tax owed on `amount` under `brackets`.
///
/// Brackets are scanned in the order given and the scan stops at the first
/// bracket above `amount`, so the table must ascend by `lower_limit`. An
/// unsorted table is not detected here; use [`BracketTable`] to check it.
pub fn compute_income_tax_liability(
    amount: f64,
    brackets: &[IncomeTaxBracket],
) -> Result<f64, RuleError> {
    require_non_negative("amount", amount)?;

    let mut liability: f64 = 0.0;
    for bracket in brackets {
        if amount >= bracket.lower_limit {
            liability = bracket.fixed_fee + (amount - bracket.lower_limit) * bracket.rate;
        } else {
            break;
        }
    }
    Ok(round2(liability.max(0.0)))
}

/// A bracket table whose lower limits are known to ascend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IncomeTaxBracket>", into = "Vec<IncomeTaxBracket>")]
pub struct BracketTable {
    brackets: Vec<IncomeTaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<IncomeTaxBracket>) -> Result<Self, RuleError> {
        for (index, pair) in brackets.windows(2).enumerate() {
            // Negated so that NaN limits are rejected too.
            if !(pair[0].lower_limit <= pair[1].lower_limit) {
                return Err(RuleError::UnsortedBrackets {
                    index: index + 1,
                    lower_limit: pair[1].lower_limit,
                });
            }
        }
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[IncomeTaxBracket] {
        &self.brackets
    }

    pub fn liability(&self, amount: f64) -> Result<f64, RuleError> {
        compute_income_tax_liability(amount, &self.brackets)
    }
}

impl TryFrom<Vec<IncomeTaxBracket>> for BracketTable {
    type Error = RuleError;

    fn try_from(brackets: Vec<IncomeTaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<IncomeTaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

// ── Business days ──

/// The date reached after counting `days` business days forward from `start`.
///
/// `start` itself never counts. Saturdays, Sundays and `holidays` are skipped.
/// With `days == 0` the result is `start`.
pub fn next_working_day(
    start: NaiveDate,
    holidays: &[NaiveDate],
    days: i64,
) -> Result<NaiveDate, RuleError> {
    if days < 0 {
        return Err(RuleError::InvalidArgument {
            name: "days",
            requirement: "non-negative",
        });
    }

    let holidays: HashSet<NaiveDate> = holidays.iter().copied().collect();
    let mut current = start;
    let mut added = 0;
    while added < days {
        current = current
            .succ_opt()
            .ok_or(RuleError::DateOutOfRange(current))?;
        if is_weekend(current) || holidays.contains(&current) {
            continue;
        }
        added += 1;
    }
    Ok(current)
}

fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), RuleError> {
    if !value.is_finite() {
        return Err(RuleError::InvalidArgument {
            name,
            requirement: "finite",
        });
    }
    if value < 0.0 {
        return Err(RuleError::InvalidArgument {
            name,
            requirement: "non-negative",
        });
    }
    Ok(())
}
