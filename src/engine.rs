//! Gale engine - the owning instance behind compiled expressions

use std::sync::Arc;

use crate::ast::{ExpressionNode, collect_variables};
use crate::evaluator::TraceSink;
use crate::expression::CompiledExpression;
use crate::registry::{FunctionRegistry, create_standard_registry};

/// Default bound on expression nesting depth
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 512;

/// Evaluation configuration shared by every expression an engine compiles
#[derive(Clone)]
pub struct EngineOptions {
    /// Fail with `MissingVariable` when a referenced variable is absent
    /// from the context; when false, an absent variable evaluates to null
    pub strict_variables: bool,

    /// Evaluating a tree nested deeper than this fails with
    /// `NestingTooDeep` instead of growing the stack without bound
    pub max_nesting_depth: usize,

    /// Trace destination used when a context enables tracing without
    /// supplying its own sink
    pub default_trace_sink: Option<Arc<dyn TraceSink>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_variables: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            default_trace_sink: None,
        }
    }
}

/// The owning instance that produces compiled expressions
///
/// An engine holds the configuration and function registry its expressions
/// resolve at evaluation time. Compiled expressions borrow the engine, so
/// it must live at least as long as every expression it compiles.
pub struct GaleEngine {
    options: EngineOptions,
    functions: Arc<FunctionRegistry>,
}

impl Default for GaleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GaleEngine {
    /// Create an engine with default options and the standard built-in
    /// functions
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an engine with custom options and the standard built-in
    /// functions
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            functions: Arc::new(create_standard_registry()),
        }
    }

    /// Create an engine with custom options and a custom registry
    pub fn with_registry(options: EngineOptions, functions: Arc<FunctionRegistry>) -> Self {
        Self { options, functions }
    }

    /// Compile a tree produced by an external compiler into an evaluatable
    /// expression, extracting its variable metadata
    pub fn compile(
        &self,
        source: impl Into<String>,
        root: ExpressionNode,
    ) -> CompiledExpression<'_> {
        let source = source.into();
        let variables = collect_variables(&root);
        log::debug!(
            "compiled expression '{source}' referencing {} variable(s)",
            variables.len()
        );
        CompiledExpression::new(self, source, root, variables)
    }

    /// The engine's evaluation configuration
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The engine's function registry
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LiteralValue;
    use crate::evaluator::EvaluationContext;
    use crate::model::GaleValue;

    #[test]
    fn test_compile_extracts_variables() {
        let engine = GaleEngine::new();
        let root = ExpressionNode::path(ExpressionNode::variable("user"), "name");
        let expression = engine.compile("user.name", root);

        assert_eq!(expression.source_text(), "user.name");
        assert_eq!(expression.variables().len(), 1);
        assert_eq!(expression.variables()[0].name(), "user.name");
    }

    #[test]
    fn test_default_engine_is_lenient() {
        let engine = GaleEngine::new();
        let expression = engine.compile("ghost", ExpressionNode::variable("ghost"));
        assert_eq!(
            expression.evaluate(&EvaluationContext::new()).unwrap(),
            GaleValue::Null
        );
    }

    #[test]
    fn test_literal_expression_ignores_context() {
        let engine = GaleEngine::new();
        let expression = engine.compile(
            "42",
            ExpressionNode::literal(LiteralValue::Integer(42)),
        );
        let noisy = EvaluationContext::new().with_variable("x", 99i64);
        assert_eq!(
            expression.evaluate(&noisy).unwrap(),
            GaleValue::Integer(42)
        );
        assert!(expression.variables().is_empty());
    }
}
