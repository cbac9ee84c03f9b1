//! Function resolution for Gale expressions
//!
//! Call nodes resolve their function name against a [`FunctionRegistry`]
//! owned by the engine. Embedding applications register their own
//! [`GaleFunction`] implementations alongside (or instead of) the standard
//! built-ins.

mod function;
mod functions;

pub use function::{
    FunctionError, FunctionRegistry, FunctionResult, FunctionSignature, GaleFunction,
};
pub use functions::{
    AbsFunction, LenFunction, LowerFunction, MaxFunction, MinFunction, UpperFunction,
    create_standard_registry,
};
