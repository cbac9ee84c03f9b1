//! Built-in functions registered by the standard registry

mod math;
mod string;

pub use math::{AbsFunction, MaxFunction, MinFunction};
pub use string::{LenFunction, LowerFunction, UpperFunction};

use std::sync::Arc;

use super::function::{FunctionError, FunctionRegistry, FunctionResult};
use crate::model::GaleValue;
use rust_decimal::Decimal;

/// Create a registry holding the standard built-in functions
pub fn create_standard_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.register(Arc::new(AbsFunction));
    registry.register(Arc::new(MinFunction));
    registry.register(Arc::new(MaxFunction));
    registry.register(Arc::new(LenFunction));
    registry.register(Arc::new(UpperFunction));
    registry.register(Arc::new(LowerFunction));
    registry
}

// The evaluator validates arity before calling; these guards keep direct
// callers from indexing out of bounds.
pub(crate) fn argument<'a>(
    name: &str,
    args: &'a [GaleValue],
    index: usize,
) -> FunctionResult<&'a GaleValue> {
    args.get(index).ok_or_else(|| FunctionError::InvalidArity {
        name: name.to_string(),
        min: index + 1,
        max: None,
        actual: args.len(),
    })
}

pub(crate) fn numeric_argument(
    name: &str,
    args: &[GaleValue],
    index: usize,
) -> FunctionResult<Decimal> {
    match argument(name, args, index)? {
        GaleValue::Integer(i) => Ok(Decimal::from(*i)),
        GaleValue::Decimal(d) => Ok(*d),
        other => Err(FunctionError::InvalidArgumentType {
            name: name.to_string(),
            index,
            expected: "Integer or Decimal".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}
