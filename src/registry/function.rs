//! Function registry backing call-node evaluation
//!
//! The registry is the resolution seam between the evaluator and whatever
//! function table the embedding application provides. Call nodes resolve
//! their name here at evaluation time; an unresolvable name surfaces as
//! `EvaluationError::FunctionNotFound`.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::model::GaleValue;

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// Invalid number of arguments
    #[error("Function '{name}' expects {min}-{} arguments, got {actual}", .max.map_or("unlimited".to_string(), |n| n.to_string()))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments (None for unlimited)
        max: Option<usize>,
        /// Actual arguments provided
        actual: usize,
    },

    /// Invalid argument type
    #[error("Function '{name}' argument {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Function name
        name: String,
        /// Argument index
        index: usize,
        /// Expected type
        expected: String,
        /// Actual type
        actual: String,
    },

    /// Runtime evaluation error
    #[error("Function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },
}

/// Arity constraints for a registered function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Minimum number of arguments
    pub min_arity: usize,
    /// Maximum number of arguments (None for unlimited)
    pub max_arity: Option<usize>,
}

impl FunctionSignature {
    /// Signature accepting exactly `arity` arguments
    pub fn fixed(arity: usize) -> Self {
        Self {
            min_arity: arity,
            max_arity: Some(arity),
        }
    }

    /// Signature accepting `min` or more arguments
    pub fn at_least(min: usize) -> Self {
        Self {
            min_arity: min,
            max_arity: None,
        }
    }
}

/// Trait for implementing Gale functions
pub trait GaleFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get the function's arity constraints
    fn signature(&self) -> FunctionSignature;

    /// Evaluate the function with already-evaluated arguments
    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue>;

    /// Validate argument count before evaluation
    fn validate_args(&self, args: &[GaleValue]) -> FunctionResult<()> {
        let signature = self.signature();
        let actual = args.len();
        if actual < signature.min_arity
            || signature.max_arity.is_some_and(|max| actual > max)
        {
            return Err(FunctionError::InvalidArity {
                name: self.name().to_string(),
                min: signature.min_arity,
                max: signature.max_arity,
                actual,
            });
        }
        Ok(())
    }
}

/// Name-keyed table of the functions available to call nodes
#[derive(Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<dyn GaleFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its own name, replacing any previous
    /// registration
    pub fn register(&mut self, function: Arc<dyn GaleFunction>) {
        self.functions.insert(function.name().to_string(), function);
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn GaleFunction>> {
        self.functions.get(name)
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
