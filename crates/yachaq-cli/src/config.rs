//! Rule-engine configuration: tax rates, bracket tables and holiday calendars.
//!
//! Rates resolve in layers: built-in defaults, then an optional JSON rates
//! file, then individual flags or `YACHAQ_*` environment variables.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use serde::de::DeserializeOwned;
use yachaq_core::{BracketTable, ImportTaxRates, parse_iso_date};

#[derive(Debug, Clone, Default, Args)]
pub struct RateArgs {
    /// JSON file with any of `ad_valorem`, `fodinfa`, `ice`, `iva`.
    #[arg(long, env = "YACHAQ_RATES")]
    pub rates: Option<std::path::PathBuf>,

    /// Ad valorem duty rate [default: 0.10]
    #[arg(long, env = "YACHAQ_AD_VALOREM")]
    pub ad_valorem: Option<f64>,

    /// FODINFA levy rate [default: 0.005]
    #[arg(long, env = "YACHAQ_FODINFA")]
    pub fodinfa: Option<f64>,

    /// ICE special consumption tax rate [default: 0.0]
    #[arg(long, env = "YACHAQ_ICE")]
    pub ice: Option<f64>,

    /// IVA rate [default: 0.12]
    #[arg(long, env = "YACHAQ_IVA")]
    pub iva: Option<f64>,
}

impl RateArgs {
    pub fn resolve(&self) -> anyhow::Result<ImportTaxRates> {
        let mut rates = match &self.rates {
            Some(path) => read_json::<ImportTaxRates>(path)?,
            None => ImportTaxRates::default(),
        };
        if let Some(v) = self.ad_valorem {
            rates.ad_valorem = v;
        }
        if let Some(v) = self.fodinfa {
            rates.fodinfa = v;
        }
        if let Some(v) = self.ice {
            rates.ice = v;
        }
        if let Some(v) = self.iva {
            rates.iva = v;
        }
        Ok(rates)
    }
}

/// Load a bracket table; unsorted tables are rejected.
pub fn load_brackets(path: &Path) -> anyhow::Result<BracketTable> {
    read_json(path)
}

/// Load a JSON array of `YYYY-MM-DD` holiday dates.
pub fn load_holidays(path: &Path) -> anyhow::Result<Vec<NaiveDate>> {
    let raw: Vec<String> = read_json(path)?;
    raw.iter()
        .map(|s| parse_date(s).map_err(anyhow::Error::msg))
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("parsing holidays in {}", path.display()))
}

/// Clap value parser for strict `YYYY-MM-DD` dates.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_iso_date(s).ok_or_else(|| format!("'{s}' is not a YYYY-MM-DD date"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn rates_default_without_overrides() {
        let rates = RateArgs::default().resolve().unwrap();
        assert_eq!(rates, ImportTaxRates::default());
    }

    #[test]
    fn flags_override_rates_file() {
        let file = fixture(r#"{"ice": 0.15, "iva": 0.15}"#);
        let args = RateArgs {
            rates: Some(file.path().to_path_buf()),
            iva: Some(0.13),
            ..Default::default()
        };
        let rates = args.resolve().unwrap();
        assert_eq!(rates.ad_valorem, 0.10);
        assert_eq!(rates.ice, 0.15);
        assert_eq!(rates.iva, 0.13);
    }

    #[test]
    fn loads_sorted_brackets_only() {
        let sorted = fixture(
            r#"[{"lower_limit": 0, "rate": 0, "fixed_fee": 0},
                {"lower_limit": 11722, "rate": 0.15, "fixed_fee": 0}]"#,
        );
        assert_eq!(load_brackets(sorted.path()).unwrap().brackets().len(), 2);

        let unsorted = fixture(
            r#"[{"lower_limit": 11722, "rate": 0.15, "fixed_fee": 0},
                {"lower_limit": 0, "rate": 0, "fixed_fee": 0}]"#,
        );
        let err = load_brackets(unsorted.path()).unwrap_err();
        assert!(format!("{err:#}").contains("ascend"));
    }

    #[test]
    fn loads_holidays() {
        let file = fixture(r#"["2025-10-09", "2025-11-02"]"#);
        let holidays = load_holidays(file.path()).unwrap();
        assert_eq!(holidays[1], NaiveDate::from_ymd_opt(2025, 11, 2).unwrap());

        let bad = fixture(r#"["2025-10-9"]"#);
        assert!(load_holidays(bad.path()).is_err());
    }

    #[test]
    fn parse_date_is_strict() {
        assert!(parse_date("2025-10-10").is_ok());
        assert_eq!(
            parse_date("10/10/2025").unwrap_err(),
            "'10/10/2025' is not a YYYY-MM-DD date"
        );
    }
}
