//! Scientific calculator engine
//!
//! The engine is a synchronous state reducer: every key press maps to one
//! method on [`Calculator`], which mutates an owned [`CalculatorState`] and
//! leaves a [`DisplaySnapshot`] for the view layer to render.
//!
//! Errors never abort a session. Domain errors, division by zero and unknown
//! operations replace the input buffer with [`ERROR_MARKER`] and the next
//! digit starts a fresh number.

pub mod calculator;
pub mod constants;
pub mod expression;
pub mod format;
pub mod functions;
pub mod history;
pub mod memory;
mod operations;
pub mod state;

pub use calculator::{Calculator, DisplaySnapshot};
pub use constants::Constant;
pub use functions::{BinaryFunction, Function, FunctionKind, Outcome};
pub use history::{History, HistoryEntry};
pub use memory::{MemoryStore, Variable};
pub use operations::BinaryOp;
pub use state::{AngleMode, CalcMode, CalculatorState, Modifier, PendingFunction};

use thiserror::Error;

/// Text shown in the main display whenever a calculation fails
pub const ERROR_MARKER: &str = "Error";

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error types - exhaustive enum ensures all cases handled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Operand outside a function's domain, or a non-finite result
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),
    /// Division (or modulus) by exact zero
    #[error("Division by zero")]
    DivisionByZero,
    /// Function or operator name missing from the dispatch table
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    /// Invalid expression syntax
    #[error("Invalid expression: {0}")]
    Parse(String),
    /// Empty expression provided
    #[error("Empty expression")]
    EmptyExpression,
}

impl CalcError {
    /// Creates an invalid operand error
    #[must_use]
    pub fn invalid_operand(message: impl Into<String>) -> Self {
        Self::InvalidOperand(message.into())
    }

    /// Creates an unknown operation error
    #[must_use]
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Returns true for errors that surface as the display error marker
    ///
    /// Parse failures stay inside the expression coercion and fall back to a
    /// best-effort number instead.
    #[must_use]
    pub const fn is_displayed(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperand(_) | Self::DivisionByZero | Self::UnknownOperation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== CalcError tests =====

    #[test]
    fn test_calc_error_display_division_by_zero() {
        let err = CalcError::DivisionByZero;
        assert_eq!(format!("{err}"), "Division by zero");
    }

    #[test]
    fn test_calc_error_display_invalid_operand() {
        let err = CalcError::invalid_operand("factorial of -1");
        assert_eq!(format!("{err}"), "Invalid operand: factorial of -1");
    }

    #[test]
    fn test_calc_error_display_unknown_operation() {
        let err = CalcError::unknown_operation("frobnicate");
        assert_eq!(format!("{err}"), "Unknown operation: frobnicate");
    }

    #[test]
    fn test_calc_error_display_parse() {
        let err = CalcError::Parse("unexpected token".into());
        assert_eq!(format!("{err}"), "Invalid expression: unexpected token");
    }

    #[test]
    fn test_calc_error_display_empty_expression() {
        assert_eq!(format!("{}", CalcError::EmptyExpression), "Empty expression");
    }

    #[test]
    fn test_calc_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CalcError::DivisionByZero);
        assert!(err.to_string().contains("Division"));
    }

    #[test]
    fn test_displayed_errors() {
        assert!(CalcError::DivisionByZero.is_displayed());
        assert!(CalcError::invalid_operand("x").is_displayed());
        assert!(CalcError::unknown_operation("x").is_displayed());
        assert!(!CalcError::Parse("x".into()).is_displayed());
        assert!(!CalcError::EmptyExpression.is_displayed());
    }

    #[test]
    fn test_error_marker_text() {
        assert_eq!(ERROR_MARKER, "Error");
    }
}
