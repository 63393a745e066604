use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// A numeric argument is outside the domain the rule is defined on.
    #[error("{name} must be {requirement}")]
    InvalidArgument {
        name: &'static str,
        requirement: &'static str,
    },

    #[error("brackets must ascend by lower_limit: bracket {index} starts at {lower_limit}")]
    UnsortedBrackets { index: usize, lower_limit: f64 },

    #[error("cannot advance past {0}: date out of range")]
    DateOutOfRange(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authority '{0}' is not recognized")]
pub struct UnknownAuthority(pub String);
