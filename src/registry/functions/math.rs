//! Math builtins

use crate::model::GaleValue;
use crate::registry::function::{
    FunctionError, FunctionResult, FunctionSignature, GaleFunction,
};
use rust_decimal::Decimal;

use super::{argument, numeric_argument};

/// abs(n) - absolute value
pub struct AbsFunction;

impl GaleFunction for AbsFunction {
    fn name(&self) -> &str {
        "abs"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::fixed(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        match argument(self.name(), args, 0)? {
            GaleValue::Integer(i) => i.checked_abs().map(GaleValue::Integer).ok_or_else(|| {
                FunctionError::EvaluationError {
                    name: self.name().to_string(),
                    message: "integer overflow".to_string(),
                }
            }),
            GaleValue::Decimal(d) => Ok(GaleValue::Decimal(d.abs())),
            other => Err(FunctionError::InvalidArgumentType {
                name: self.name().to_string(),
                index: 0,
                expected: "Integer or Decimal".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}

/// min(a, b, ...) - smallest numeric argument
pub struct MinFunction;

impl GaleFunction for MinFunction {
    fn name(&self) -> &str {
        "min"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::at_least(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        pick_extreme(self.name(), args, |candidate, best| candidate < best)
    }
}

/// max(a, b, ...) - largest numeric argument
pub struct MaxFunction;

impl GaleFunction for MaxFunction {
    fn name(&self) -> &str {
        "max"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::at_least(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        pick_extreme(self.name(), args, |candidate, best| candidate > best)
    }
}

// Returns the original argument value, not its Decimal widening, so
// min(1, 2.5) stays an Integer.
fn pick_extreme(
    name: &str,
    args: &[GaleValue],
    better: impl Fn(Decimal, Decimal) -> bool,
) -> FunctionResult<GaleValue> {
    let mut best_index = 0;
    let mut best = numeric_argument(name, args, 0)?;
    for index in 1..args.len() {
        let candidate = numeric_argument(name, args, index)?;
        if better(candidate, best) {
            best = candidate;
            best_index = index;
        }
    }
    Ok(args[best_index].clone())
}
