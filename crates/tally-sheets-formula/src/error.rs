//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula validation or evaluation
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula body fails grammar validation at write time
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// Cycle detected during evaluation, carries the offending address
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(String),

    /// Division or modulo by zero, carries the address being evaluated
    #[error("Division by zero while evaluating cell {0}")]
    DivisionByZero(String),

    /// Malformed cell address
    #[error(transparent)]
    Address(#[from] tally_sheets_core::Error),
}
