pub mod contract;
pub mod error;
pub mod rules;

pub use contract::{
    Authority, ChunkMetadata, REQUIRED_KEYS, is_blank, parse_iso_date, validate_chunk_metadata,
    value_text,
};
pub use error::{RuleError, UnknownAuthority};
pub use rules::{
    BracketTable, ComputationResult, DEFAULT_WORKING_DAYS, ImportTaxRates, IncomeTaxBracket,
    TaxBreakdown, compute_import_taxes, compute_income_tax_liability, next_working_day, round2,
};
