//! Evaluation core for the Gale embeddable expression language
//!
//! A compiled expression is an immutable tree of [`ExpressionNode`]s plus
//! its source text and variable metadata. It is produced once by a
//! [`GaleEngine`] from compiler output, then evaluated any number of times
//! against per-call [`EvaluationContext`]s, concurrently if desired.
//! Evaluation is a pure, synchronous reduction of the tree; its only side
//! effect is optional tracing through an explicit [`TraceSink`].
//!
//! ```
//! use gale_expr::{BinaryOperator, EvaluationContext, ExpressionNode, GaleEngine, GaleValue, LiteralValue};
//!
//! let engine = GaleEngine::new();
//! let root = ExpressionNode::binary_op(
//!     BinaryOperator::Multiply,
//!     ExpressionNode::variable("x"),
//!     ExpressionNode::literal(LiteralValue::Integer(3)),
//! );
//! let expression = engine.compile("x * 3", root);
//!
//! let context = EvaluationContext::new().with_variable("x", 14i64);
//! assert_eq!(expression.evaluate(&context).unwrap(), GaleValue::Integer(42));
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod model;
pub mod registry;

// Re-export main types
pub use ast::{
    BinaryOperator, ExpressionNode, LiteralValue, PathSegment, UnaryOperator, VariableMeta,
    collect_variables,
};
pub use engine::{EngineOptions, GaleEngine};
pub use error::{EvaluationError, EvaluationResult};
pub use evaluator::{CollectingSink, EvaluationContext, LogSink, TraceSink};
pub use expression::CompiledExpression;
pub use model::GaleValue;
pub use registry::{FunctionRegistry, GaleFunction, create_standard_registry};
