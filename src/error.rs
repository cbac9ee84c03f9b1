//! Error types for Gale expression evaluation

use thiserror::Error;

use crate::registry::FunctionError;

/// Result type alias for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while evaluating a compiled expression
///
/// An error aborts the evaluation immediately and propagates to the caller
/// unmodified; sibling nodes are not evaluated and no partial value is
/// produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// A referenced variable is absent from the execution context and the
    /// engine is configured strict
    #[error("Variable '{name}' not found in execution context")]
    MissingVariable {
        /// Variable name
        name: String,
    },

    /// An operator was applied to operand types it cannot combine
    #[error("Type mismatch: operator '{operator}' cannot be applied to {operand_types:?}")]
    TypeMismatch {
        /// Operator symbol
        operator: String,
        /// Type names of the offending operands
        operand_types: Vec<String>,
    },

    /// A call node references a function the registry cannot resolve
    #[error("Function '{name}' not found")]
    FunctionNotFound {
        /// Function name
        name: String,
    },

    /// A resolved function rejected its arguments or failed while running
    #[error("Function error: {0}")]
    Function(#[from] FunctionError),

    /// Index access outside the bounds of an array
    #[error("Index {index} out of bounds for array of size {size}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Array size
        size: usize,
    },

    /// Overflow, division by zero, or other arithmetic failure
    #[error("Arithmetic error: {message}")]
    Arithmetic {
        /// Error message
        message: String,
    },

    /// Expression nesting depth exceeds the engine's configured maximum
    #[error("Expression nesting depth exceeds maximum of {max}")]
    NestingTooDeep {
        /// The configured maximum
        max: usize,
    },
}

impl EvaluationError {
    /// Create a missing-variable error
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Create a type-mismatch error
    pub fn type_mismatch(operator: impl Into<String>, operand_types: Vec<String>) -> Self {
        Self::TypeMismatch {
            operator: operator.into(),
            operand_types,
        }
    }

    /// Create a function-not-found error
    pub fn function_not_found(name: impl Into<String>) -> Self {
        Self::FunctionNotFound { name: name.into() }
    }

    /// Create an arithmetic error
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic {
            message: message.into(),
        }
    }
}
