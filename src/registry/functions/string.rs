//! String builtins

use crate::model::GaleValue;
use crate::registry::function::{
    FunctionError, FunctionResult, FunctionSignature, GaleFunction,
};

use super::argument;

/// len(value) - character count of a string or element count of an array
pub struct LenFunction;

impl GaleFunction for LenFunction {
    fn name(&self) -> &str {
        "len"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::fixed(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        let length = match argument(self.name(), args, 0)? {
            GaleValue::String(s) => s.chars().count(),
            GaleValue::Array(items) => items.len(),
            GaleValue::Json(serde_json::Value::Array(items)) => items.len(),
            other => {
                return Err(FunctionError::InvalidArgumentType {
                    name: self.name().to_string(),
                    index: 0,
                    expected: "String or Array".to_string(),
                    actual: other.type_name().to_string(),
                });
            }
        };
        Ok(GaleValue::Integer(length as i64))
    }
}

/// upper(s) - converts to uppercase
pub struct UpperFunction;

impl GaleFunction for UpperFunction {
    fn name(&self) -> &str {
        "upper"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::fixed(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        string_argument(self.name(), args).map(|s| GaleValue::String(s.to_uppercase()))
    }
}

/// lower(s) - converts to lowercase
pub struct LowerFunction;

impl GaleFunction for LowerFunction {
    fn name(&self) -> &str {
        "lower"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::fixed(1)
    }

    fn call(&self, args: &[GaleValue]) -> FunctionResult<GaleValue> {
        string_argument(self.name(), args).map(|s| GaleValue::String(s.to_lowercase()))
    }
}

fn string_argument<'a>(name: &str, args: &'a [GaleValue]) -> FunctionResult<&'a str> {
    match argument(name, args, 0)? {
        GaleValue::String(s) => Ok(s),
        other => Err(FunctionError::InvalidArgumentType {
            name: name.to_string(),
            index: 0,
            expected: "String".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}
