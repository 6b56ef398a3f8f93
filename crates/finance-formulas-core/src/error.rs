use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Empty input: {field} must contain at least one observation")]
    EmptyInput { field: String },

    #[error("Shape mismatch: {left} has {left_len} observations but {right} has {right_len}")]
    ShapeMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric domain error in {context}")]
    NumericDomain { context: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (npv: {last_npv})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_npv: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinanceError {
    fn from(e: serde_json::Error) -> Self {
        FinanceError::SerializationError(e.to_string())
    }
}
