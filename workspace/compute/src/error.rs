use rust_decimal::Decimal;
use thiserror::Error;

/// Locally detected input problems, always raised before any write. Every
/// variant carries the offending values so the caller can self-correct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("month must be between 1 and 12, got {month}")]
    MonthOutOfRange { month: u32 },

    #[error("forecast disposable income must be >= 0, got {value}")]
    NegativeForecastIncome { value: Decimal },

    /// Group ids that do not belong to the user or are not expense groups.
    #[error("invalid group ids for this user: {ids:?}")]
    InvalidGroupIds { ids: Vec<i32> },

    #[error("cannot allocate by amount for group {group_id} when forecast disposable income is 0")]
    AmountModeWithZeroIncome { group_id: i32 },

    #[error("manual allocation exceeds the available share: {attempted}% requested, {allowed}% allocatable")]
    PercentOverCeiling { attempted: Decimal, allowed: Decimal },

    #[error("manual allocation amount exceeds available disposable income: {attempted} requested, {allowed} allocatable")]
    AmountOverCeiling { attempted: Decimal, allowed: Decimal },
}

/// Error types for the compute crate.
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Rejected input, detected before any write
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A row the caller referenced does not exist for this user
    #[error("{entity} {id} not found for this user")]
    NotFound { entity: &'static str, id: i32 },
}

impl ComputeError {
    /// Convenience accessor for tests and callers that map validation
    /// failures to a 4xx response.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ComputeError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
