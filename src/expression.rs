//! Compiled Gale expressions

use crate::ast::{ExpressionNode, VariableMeta};
use crate::engine::GaleEngine;
use crate::error::EvaluationResult;
use crate::evaluator::{EvaluationContext, Evaluator};
use crate::model::GaleValue;

/// A compiled expression ready for evaluation.
///
/// A compiled expression owns its source text, root node, and variable
/// metadata, and borrows the engine that produced it for configuration
/// (strictness, function registry, default trace sink). It is immutable
/// after construction and may be evaluated any number of times, from any
/// number of threads at once, each call with its own context.
///
/// # Example
///
/// ```
/// use gale_expr::{BinaryOperator, EvaluationContext, ExpressionNode, GaleEngine, GaleValue, LiteralValue};
///
/// let engine = GaleEngine::new();
/// let root = ExpressionNode::binary_op(
///     BinaryOperator::Add,
///     ExpressionNode::variable("x"),
///     ExpressionNode::literal(LiteralValue::Integer(2)),
/// );
/// let expression = engine.compile("x + 2", root);
///
/// let context = EvaluationContext::new().with_variable("x", 40i64);
/// assert_eq!(expression.evaluate(&context).unwrap(), GaleValue::Integer(42));
///
/// let names: Vec<_> = expression.variables().iter().map(|v| v.name()).collect();
/// assert_eq!(names, vec!["x"]);
/// ```
pub struct CompiledExpression<'a> {
    /// Engine that produced this expression; resolves configuration at
    /// evaluation time and must outlive every evaluation call
    engine: &'a GaleEngine,

    /// Original textual form
    source: String,

    /// Root of the expression tree
    root: ExpressionNode,

    /// Variables referenced by the tree, deduplicated by name in
    /// first-occurrence order
    variables: Vec<VariableMeta>,
}

impl<'a> CompiledExpression<'a> {
    pub(crate) fn new(
        engine: &'a GaleEngine,
        source: String,
        root: ExpressionNode,
        variables: Vec<VariableMeta>,
    ) -> Self {
        Self {
            engine,
            source,
            root,
            variables,
        }
    }

    /// Evaluate the expression against a per-call context
    pub fn evaluate(&self, context: &EvaluationContext) -> EvaluationResult<GaleValue> {
        Evaluator::new(self.engine.options(), self.engine.functions())
            .evaluate(&self.root, context)
    }

    /// The original textual form of the expression
    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Metadata for every variable the tree references
    pub fn variables(&self) -> &[VariableMeta] {
        &self.variables
    }

    /// The root node of the expression tree
    pub fn root(&self) -> &ExpressionNode {
        &self.root
    }
}
