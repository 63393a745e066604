mod config;
mod display;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use yachaq_core::{DEFAULT_WORKING_DAYS, compute_import_taxes, next_working_day};
use yachaq_eval::{YearHistogram, audit_chunks, evaluate_records, load_jsonl, scan_jsonl};

use crate::config::{RateArgs, load_brackets, load_holidays, parse_date};

#[derive(Debug, Parser)]
#[command(name = "yachaq", version, about = "Ecuadorian legal knowledge base tooling")]
struct Cli {
    /// Print results as JSON instead of text cards.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate chunk metadata records in a JSONL file.
    Validate {
        file: PathBuf,

        /// Failing records to list in the text card.
        #[arg(long, default_value_t = 20)]
        max_failures: usize,
    },

    /// Citation accuracy, hallucination rate and freshness of answers in a JSONL file.
    Eval { file: PathBuf },

    /// Count metadata records per publication year.
    Years {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Import duties on a CIF value.
    ImportTaxes {
        #[arg(long, allow_negative_numbers = true)]
        cif: f64,

        #[command(flatten)]
        rates: RateArgs,
    },

    /// Income tax owed under a progressive bracket table.
    IncomeTax {
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// JSON array of {lower_limit, rate, fixed_fee}, ascending.
        #[arg(long, env = "YACHAQ_BRACKETS")]
        brackets: PathBuf,
    },

    /// Date reached after a number of business days.
    WorkingDay {
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        #[arg(long, default_value_t = DEFAULT_WORKING_DAYS, allow_negative_numbers = true)]
        days: i64,

        /// Holiday to skip; repeatable.
        #[arg(long = "holiday", value_parser = parse_date)]
        holidays: Vec<NaiveDate>,

        /// JSON array of YYYY-MM-DD holidays.
        #[arg(long, env = "YACHAQ_HOLIDAYS")]
        holidays_file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct YearsOutput<'a> {
    path: String,
    skipped: usize,
    #[serde(flatten)]
    histogram: &'a YearHistogram,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("yachaq v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    Ok(if run(cli)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute a command. Returns `false` when the command ran but found problems.
fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Validate { file, max_failures } => {
            let records = load_jsonl(&file)?;
            let audit = audit_chunks(&records);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&audit)?);
            } else {
                print!("{}", display::audit_card(&file, &audit, max_failures));
            }
            return Ok(audit.is_clean());
        }

        Command::Eval { file } => {
            let records = load_jsonl(&file)?;
            let metrics = evaluate_records(records.iter().map(|r| &r.value));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", display::metrics_card(&file, &metrics));
            }
        }

        Command::Years { files } => {
            for path in &files {
                if !path.exists() {
                    println!("missing:\t{}", path.display());
                    continue;
                }
                let scan = scan_jsonl(path)?;
                let histogram =
                    YearHistogram::from_records(scan.records.iter().map(|r| &r.value));
                if cli.json {
                    let output = YearsOutput {
                        path: path.display().to_string(),
                        skipped: scan.skipped,
                        histogram: &histogram,
                    };
                    println!("{}", serde_json::to_string(&output)?);
                } else {
                    print!("{}", display::years_report(path, &histogram, scan.skipped));
                }
            }
        }

        Command::ImportTaxes { cif, rates } => {
            let rates = rates.resolve()?;
            let result = compute_import_taxes(cif, &rates)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", display::import_taxes_card(&result));
            }
        }

        Command::IncomeTax { amount, brackets } => {
            let table = load_brackets(&brackets)?;
            let liability = table.liability(amount)?;
            if cli.json {
                let output = serde_json::json!({ "amount": amount, "liability": liability });
                println!("{output}");
            } else {
                print!("{}", display::income_tax_card(amount, &table, liability));
            }
        }

        Command::WorkingDay {
            start,
            days,
            mut holidays,
            holidays_file,
        } => {
            if let Some(path) = holidays_file {
                holidays.extend(load_holidays(&path)?);
            }
            let due = next_working_day(start, &holidays, days)
                .with_context(|| format!("counting {days} business days from {start}"))?;
            if cli.json {
                let output = serde_json::json!({
                    "start": start.to_string(),
                    "days": days,
                    "due": due.to_string(),
                });
                println!("{output}");
            } else {
                print!("{}", display::working_day_card(start, days, holidays.len(), due));
            }
        }
    }
    Ok(true)
}
