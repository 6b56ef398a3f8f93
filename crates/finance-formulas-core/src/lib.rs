pub mod cash_flows;
pub mod error;
pub mod time_value;
pub mod types;

mod math;

#[cfg(feature = "statistics")]
pub mod statistics;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::FinanceError;
pub use types::*;

/// Standard result type for all finance-formulas operations
pub type FinanceResult<T> = Result<T, FinanceError>;
