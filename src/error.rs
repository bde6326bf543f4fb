//! Error types for loading expenses and running the CLI.
//!
//! The settlement engine itself is total and never returns these; they cover
//! input parsing, configuration and output.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, SettleError>;

/// Errors that can occur outside the pure netting computation.
#[derive(Error, Debug)]
pub enum SettleError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Row that could not be turned into an expense or split
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Expense id declared twice in the same group
    #[error("Duplicate expense ID {expense} at row {row}")]
    DuplicateExpense { expense: String, row: usize },

    /// Split row referencing an expense that was never declared
    #[error("Split at row {row} references unknown expense {expense}")]
    UnknownExpense { expense: String, row: usize },

    /// Splits do not add up to the expense amount (strict mode only)
    #[error("Expense {expense}: splits total {split_total} but amount is {amount}")]
    UnbalancedExpense {
        expense: String,
        amount: Money,
        split_total: Money,
    },

    /// Tolerance must be strictly positive
    #[error("Invalid tolerance {0}: must be greater than zero")]
    InvalidTolerance(Money),
}
