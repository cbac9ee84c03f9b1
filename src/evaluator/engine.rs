//! Recursive evaluation of expression trees
//!
//! Evaluation is a synchronous, depth-first reduction of the tree against a
//! per-call context. It never mutates the tree or the context, so a single
//! compiled tree can be evaluated from any number of threads at once.

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::sync::Arc;

use super::context::EvaluationContext;
use super::trace::TraceSink;
use crate::ast::{BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator};
use crate::engine::EngineOptions;
use crate::error::{EvaluationError, EvaluationResult};
use crate::model::GaleValue;
use crate::registry::FunctionRegistry;

/// Tree-walking evaluator borrowing its configuration from the engine
pub struct Evaluator<'a> {
    options: &'a EngineOptions,
    functions: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over the given configuration and registry
    pub fn new(options: &'a EngineOptions, functions: &'a FunctionRegistry) -> Self {
        Self { options, functions }
    }

    /// Evaluate a tree against a context
    pub fn evaluate(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext,
    ) -> EvaluationResult<GaleValue> {
        self.eval(node, context, 0)
    }

    fn eval(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        if depth >= self.options.max_nesting_depth {
            return Err(EvaluationError::NestingTooDeep {
                max: self.options.max_nesting_depth,
            });
        }
        match self.sink(context) {
            Some(sink) => {
                Self::trace(sink.as_ref(), &format!("Tracing: {node}"));
                let value = self.eval_node(node, context, depth)?;
                Self::trace(sink.as_ref(), &format!("Result : {value}"));
                Ok(value)
            }
            None => self.eval_node(node, context, depth),
        }
    }

    fn sink<'c>(&'c self, context: &'c EvaluationContext) -> Option<&'c Arc<dyn TraceSink>> {
        if !context.is_trace_enabled() {
            return None;
        }
        context
            .trace_sink()
            .or(self.options.default_trace_sink.as_ref())
    }

    // Sink failures must never influence the evaluation outcome.
    fn trace(sink: &dyn TraceSink, line: &str) {
        let _ = sink.emit(line);
    }

    fn eval_node(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        match node {
            ExpressionNode::Literal(literal) => Ok(Self::eval_literal(literal)),

            ExpressionNode::Variable(name) => self.eval_variable(name, context),

            ExpressionNode::UnaryOp { op, operand } => {
                let value = self.eval(operand, context, depth + 1)?;
                Self::eval_unary(*op, value)
            }

            ExpressionNode::BinaryOp { op, left, right } => {
                self.eval_binary(*op, left, right, context, depth)
            }

            ExpressionNode::FunctionCall { name, args } => {
                self.eval_call(name, args, context, depth)
            }

            ExpressionNode::Path { base, path } => {
                let base = self.eval(base, context, depth + 1)?;
                Self::eval_path(base, path)
            }

            ExpressionNode::Index { base, index } => self.eval_index(base, index, context, depth),

            ExpressionNode::Conditional {
                condition,
                then_expr,
                else_expr,
            } => self.eval_conditional(condition, then_expr, else_expr.as_deref(), context, depth),
        }
    }

    fn eval_literal(literal: &LiteralValue) -> GaleValue {
        match literal {
            LiteralValue::Boolean(b) => GaleValue::Boolean(*b),
            LiteralValue::Integer(i) => GaleValue::Integer(*i),
            LiteralValue::Decimal(d) => GaleValue::Decimal(*d),
            LiteralValue::String(s) => GaleValue::String(s.clone()),
            LiteralValue::Null => GaleValue::Null,
        }
    }

    fn eval_variable(
        &self,
        name: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<GaleValue> {
        match context.get_variable(name) {
            Some(value) => Ok(value.clone()),
            None if self.options.strict_variables => {
                Err(EvaluationError::missing_variable(name))
            }
            None => Ok(GaleValue::Null),
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        use BinaryOperator::*;
        match op {
            // Logical operators short-circuit: the right operand is not
            // evaluated (and therefore not traced) when the left decides.
            And => match self.eval_boolean_operand(op, left, context, depth)? {
                false => Ok(GaleValue::Boolean(false)),
                true => self
                    .eval_boolean_operand(op, right, context, depth)
                    .map(GaleValue::Boolean),
            },
            Or => match self.eval_boolean_operand(op, left, context, depth)? {
                true => Ok(GaleValue::Boolean(true)),
                false => self
                    .eval_boolean_operand(op, right, context, depth)
                    .map(GaleValue::Boolean),
            },
            Add => {
                let (lhs, rhs) = self.eval_operands(left, right, context, depth)?;
                Self::eval_add(lhs, rhs)
            }
            Subtract | Multiply | Divide | Modulo => {
                let (lhs, rhs) = self.eval_operands(left, right, context, depth)?;
                Self::eval_arithmetic(op, lhs, rhs)
            }
            Equal | NotEqual => {
                let (lhs, rhs) = self.eval_operands(left, right, context, depth)?;
                let equal = Self::values_equal(&lhs, &rhs);
                Ok(GaleValue::Boolean(if matches!(op, Equal) {
                    equal
                } else {
                    !equal
                }))
            }
            LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => {
                let (lhs, rhs) = self.eval_operands(left, right, context, depth)?;
                Self::eval_ordering(op, lhs, rhs)
            }
        }
    }

    fn eval_operands(
        &self,
        left: &ExpressionNode,
        right: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<(GaleValue, GaleValue)> {
        Ok((
            self.eval(left, context, depth + 1)?,
            self.eval(right, context, depth + 1)?,
        ))
    }

    fn eval_boolean_operand(
        &self,
        op: BinaryOperator,
        node: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<bool> {
        match self.eval(node, context, depth + 1)? {
            GaleValue::Boolean(b) => Ok(b),
            other => Err(EvaluationError::type_mismatch(
                op.symbol(),
                vec![other.type_name().to_string()],
            )),
        }
    }

    fn eval_add(lhs: GaleValue, rhs: GaleValue) -> EvaluationResult<GaleValue> {
        match (lhs, rhs) {
            (GaleValue::String(a), GaleValue::String(b)) => Ok(GaleValue::String(a + &b)),
            (GaleValue::String(a), b) => Ok(GaleValue::String(format!("{a}{b}"))),
            (a, GaleValue::String(b)) => Ok(GaleValue::String(format!("{a}{b}"))),
            (a, b) => Self::eval_arithmetic(BinaryOperator::Add, a, b),
        }
    }

    fn eval_arithmetic(
        op: BinaryOperator,
        lhs: GaleValue,
        rhs: GaleValue,
    ) -> EvaluationResult<GaleValue> {
        match (&lhs, &rhs) {
            (GaleValue::Integer(a), GaleValue::Integer(b)) => Self::integer_arithmetic(op, *a, *b),
            _ => match (Self::as_number(&lhs), Self::as_number(&rhs)) {
                (Some(a), Some(b)) => Self::decimal_arithmetic(op, a, b),
                _ => Err(EvaluationError::type_mismatch(
                    op.symbol(),
                    vec![
                        lhs.type_name().to_string(),
                        rhs.type_name().to_string(),
                    ],
                )),
            },
        }
    }

    fn as_number(value: &GaleValue) -> Option<Decimal> {
        match value {
            GaleValue::Integer(i) => Some(Decimal::from(*i)),
            GaleValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn integer_arithmetic(op: BinaryOperator, a: i64, b: i64) -> EvaluationResult<GaleValue> {
        use BinaryOperator::*;
        let result = match op {
            Add => a.checked_add(b),
            Subtract => a.checked_sub(b),
            Multiply => a.checked_mul(b),
            Divide => {
                if b == 0 {
                    return Err(EvaluationError::arithmetic("division by zero"));
                }
                a.checked_div(b)
            }
            Modulo => {
                if b == 0 {
                    return Err(EvaluationError::arithmetic("modulo by zero"));
                }
                a.checked_rem(b)
            }
            _ => {
                return Err(EvaluationError::type_mismatch(
                    op.symbol(),
                    vec!["Integer".to_string(), "Integer".to_string()],
                ));
            }
        };
        result.map(GaleValue::Integer).ok_or_else(|| {
            EvaluationError::arithmetic(format!("integer overflow in '{}'", op.symbol()))
        })
    }

    fn decimal_arithmetic(op: BinaryOperator, a: Decimal, b: Decimal) -> EvaluationResult<GaleValue> {
        use BinaryOperator::*;
        let result = match op {
            Add => a.checked_add(b),
            Subtract => a.checked_sub(b),
            Multiply => a.checked_mul(b),
            Divide => {
                if b.is_zero() {
                    return Err(EvaluationError::arithmetic("division by zero"));
                }
                a.checked_div(b)
            }
            Modulo => {
                if b.is_zero() {
                    return Err(EvaluationError::arithmetic("modulo by zero"));
                }
                a.checked_rem(b)
            }
            _ => {
                return Err(EvaluationError::type_mismatch(
                    op.symbol(),
                    vec!["Decimal".to_string(), "Decimal".to_string()],
                ));
            }
        };
        result.map(GaleValue::Decimal).ok_or_else(|| {
            EvaluationError::arithmetic(format!("decimal overflow in '{}'", op.symbol()))
        })
    }

    // Equality compares same-variant values structurally and numbers across
    // the Integer/Decimal divide; values of unrelated types are unequal.
    fn values_equal(lhs: &GaleValue, rhs: &GaleValue) -> bool {
        match (lhs, rhs) {
            (GaleValue::Integer(a), GaleValue::Decimal(b))
            | (GaleValue::Decimal(b), GaleValue::Integer(a)) => Decimal::from(*a) == *b,
            (a, b) => a == b,
        }
    }

    fn eval_ordering(
        op: BinaryOperator,
        lhs: GaleValue,
        rhs: GaleValue,
    ) -> EvaluationResult<GaleValue> {
        use BinaryOperator::*;
        let ordering = match (&lhs, &rhs) {
            (GaleValue::String(a), GaleValue::String(b)) => a.cmp(b),
            (a, b) => match (Self::as_number(a), Self::as_number(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    return Err(EvaluationError::type_mismatch(
                        op.symbol(),
                        vec![
                            lhs.type_name().to_string(),
                            rhs.type_name().to_string(),
                        ],
                    ));
                }
            },
        };
        let result = match op {
            LessThan => ordering == Ordering::Less,
            LessThanOrEqual => ordering != Ordering::Greater,
            GreaterThan => ordering == Ordering::Greater,
            GreaterThanOrEqual => ordering != Ordering::Less,
            _ => {
                return Err(EvaluationError::type_mismatch(
                    op.symbol(),
                    vec![
                        lhs.type_name().to_string(),
                        rhs.type_name().to_string(),
                    ],
                ));
            }
        };
        Ok(GaleValue::Boolean(result))
    }

    fn eval_unary(op: UnaryOperator, value: GaleValue) -> EvaluationResult<GaleValue> {
        use UnaryOperator::*;
        match (op, value) {
            (Not, GaleValue::Boolean(b)) => Ok(GaleValue::Boolean(!b)),
            (Minus, GaleValue::Integer(i)) => i
                .checked_neg()
                .map(GaleValue::Integer)
                .ok_or_else(|| EvaluationError::arithmetic("integer overflow in negation")),
            (Minus, GaleValue::Decimal(d)) => Ok(GaleValue::Decimal(-d)),
            (Plus, value @ (GaleValue::Integer(_) | GaleValue::Decimal(_))) => Ok(value),
            (op, value) => Err(EvaluationError::type_mismatch(
                op.symbol(),
                vec![value.type_name().to_string()],
            )),
        }
    }

    fn eval_call(
        &self,
        name: &str,
        args: &[ExpressionNode],
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        let Some(function) = self.functions.get(name) else {
            return Err(EvaluationError::function_not_found(name));
        };
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, context, depth + 1)?);
        }
        function.validate_args(&values)?;
        Ok(function.call(&values)?)
    }

    fn eval_path(base: GaleValue, property: &str) -> EvaluationResult<GaleValue> {
        match base {
            // Navigation through null stays null in both modes.
            GaleValue::Null => Ok(GaleValue::Null),
            GaleValue::Json(JsonValue::Object(mut map)) => Ok(map
                .remove(property)
                .map(GaleValue::from)
                .unwrap_or(GaleValue::Null)),
            other => Err(EvaluationError::type_mismatch(
                ".",
                vec![other.type_name().to_string()],
            )),
        }
    }

    fn eval_index(
        &self,
        base: &ExpressionNode,
        index: &ExpressionNode,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        let base = self.eval(base, context, depth + 1)?;
        let index = match self.eval(index, context, depth + 1)? {
            GaleValue::Integer(i) => i,
            other => {
                return Err(EvaluationError::type_mismatch(
                    "[]",
                    vec![
                        base.type_name().to_string(),
                        other.type_name().to_string(),
                    ],
                ));
            }
        };
        match base {
            GaleValue::Null => Ok(GaleValue::Null),
            GaleValue::Array(mut items) => {
                let position = Self::array_position(index, items.len())?;
                Ok(items.swap_remove(position))
            }
            GaleValue::Json(JsonValue::Array(mut items)) => {
                let position = Self::array_position(index, items.len())?;
                Ok(GaleValue::from(items.swap_remove(position)))
            }
            other => Err(EvaluationError::type_mismatch(
                "[]",
                vec![other.type_name().to_string(), "Integer".to_string()],
            )),
        }
    }

    fn array_position(index: i64, size: usize) -> EvaluationResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&position| position < size)
            .ok_or(EvaluationError::IndexOutOfBounds { index, size })
    }

    fn eval_conditional(
        &self,
        condition: &ExpressionNode,
        then_expr: &ExpressionNode,
        else_expr: Option<&ExpressionNode>,
        context: &EvaluationContext,
        depth: usize,
    ) -> EvaluationResult<GaleValue> {
        match self.eval(condition, context, depth + 1)? {
            GaleValue::Boolean(true) => self.eval(then_expr, context, depth + 1),
            GaleValue::Boolean(false) => match else_expr {
                Some(node) => self.eval(node, context, depth + 1),
                None => Ok(GaleValue::Null),
            },
            other => Err(EvaluationError::type_mismatch(
                "?:",
                vec![other.type_name().to_string()],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::create_standard_registry;
    use serde_json::json;

    fn options() -> EngineOptions {
        EngineOptions::default()
    }

    fn eval(node: &ExpressionNode, context: &EvaluationContext) -> EvaluationResult<GaleValue> {
        let options = options();
        let functions = create_standard_registry();
        Evaluator::new(&options, &functions).evaluate(node, context)
    }

    fn int(i: i64) -> ExpressionNode {
        ExpressionNode::literal(LiteralValue::Integer(i))
    }

    fn dec(s: &str) -> ExpressionNode {
        ExpressionNode::literal(LiteralValue::Decimal(s.parse().unwrap()))
    }

    #[test]
    fn test_literal_evaluation() {
        let context = EvaluationContext::new();
        assert_eq!(eval(&int(42), &context).unwrap(), GaleValue::Integer(42));
        assert_eq!(
            eval(
                &ExpressionNode::literal(LiteralValue::String("hi".into())),
                &context
            )
            .unwrap(),
            GaleValue::String("hi".into())
        );
        assert_eq!(
            eval(&ExpressionNode::literal(LiteralValue::Null), &context).unwrap(),
            GaleValue::Null
        );
    }

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        let context = EvaluationContext::new();
        let sum = ExpressionNode::binary_op(BinaryOperator::Add, int(40), int(2));
        assert_eq!(eval(&sum, &context).unwrap(), GaleValue::Integer(42));

        let quotient = ExpressionNode::binary_op(BinaryOperator::Divide, int(7), int(2));
        assert_eq!(eval(&quotient, &context).unwrap(), GaleValue::Integer(3));
    }

    #[test]
    fn test_decimal_operand_promotes() {
        let context = EvaluationContext::new();
        let product = ExpressionNode::binary_op(BinaryOperator::Multiply, dec("1.5"), int(2));
        assert_eq!(
            eval(&product, &context).unwrap(),
            GaleValue::Decimal("3.0".parse().unwrap())
        );
    }

    #[test]
    fn test_string_concatenation() {
        let context = EvaluationContext::new();
        let expr = ExpressionNode::binary_op(
            BinaryOperator::Add,
            ExpressionNode::literal(LiteralValue::String("n = ".into())),
            int(7),
        );
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::String("n = 7".into()));
    }

    #[test]
    fn test_division_by_zero() {
        let context = EvaluationContext::new();
        let expr = ExpressionNode::binary_op(BinaryOperator::Divide, int(1), int(0));
        assert_eq!(
            eval(&expr, &context),
            Err(EvaluationError::arithmetic("division by zero"))
        );
    }

    #[test]
    fn test_type_mismatch_reports_operand_types() {
        let context = EvaluationContext::new();
        let expr = ExpressionNode::binary_op(
            BinaryOperator::Subtract,
            ExpressionNode::literal(LiteralValue::String("a".into())),
            int(1),
        );
        assert_eq!(
            eval(&expr, &context),
            Err(EvaluationError::type_mismatch(
                "-",
                vec!["String".to_string(), "Integer".to_string()]
            ))
        );
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        let context = EvaluationContext::new();
        let expr = ExpressionNode::binary_op(BinaryOperator::Equal, int(2), dec("2.0"));
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::Boolean(true));
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let context = EvaluationContext::new();
        // false && (1 / 0 == 0) must not reach the division
        let poison = ExpressionNode::binary_op(
            BinaryOperator::Equal,
            ExpressionNode::binary_op(BinaryOperator::Divide, int(1), int(0)),
            int(0),
        );
        let expr = ExpressionNode::binary_op(
            BinaryOperator::And,
            ExpressionNode::literal(LiteralValue::Boolean(false)),
            poison,
        );
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::Boolean(false));
    }

    #[test]
    fn test_unary_operators() {
        let context = EvaluationContext::new();
        let negated = ExpressionNode::unary_op(UnaryOperator::Minus, int(5));
        assert_eq!(eval(&negated, &context).unwrap(), GaleValue::Integer(-5));

        let not = ExpressionNode::unary_op(
            UnaryOperator::Not,
            ExpressionNode::literal(LiteralValue::Boolean(false)),
        );
        assert_eq!(eval(&not, &context).unwrap(), GaleValue::Boolean(true));

        let bad = ExpressionNode::unary_op(
            UnaryOperator::Not,
            ExpressionNode::literal(LiteralValue::Integer(1)),
        );
        assert!(matches!(
            eval(&bad, &context),
            Err(EvaluationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_path_navigation() {
        let context = EvaluationContext::new()
            .with_variable("user", GaleValue::from(json!({"name": "ada", "age": 36})));
        let expr = ExpressionNode::path(ExpressionNode::variable("user"), "name");
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::String("ada".into()));

        let absent = ExpressionNode::path(ExpressionNode::variable("user"), "email");
        assert_eq!(eval(&absent, &context).unwrap(), GaleValue::Null);

        let wrong = ExpressionNode::path(int(1), "name");
        assert!(matches!(
            eval(&wrong, &context),
            Err(EvaluationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_index_access() {
        let context = EvaluationContext::new()
            .with_variable("items", GaleValue::from(json!(["a", "b", "c"])));
        let expr = ExpressionNode::index(ExpressionNode::variable("items"), int(1));
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::String("b".into()));

        let out = ExpressionNode::index(ExpressionNode::variable("items"), int(3));
        assert_eq!(
            eval(&out, &context),
            Err(EvaluationError::IndexOutOfBounds { index: 3, size: 3 })
        );

        let negative = ExpressionNode::index(ExpressionNode::variable("items"), int(-1));
        assert_eq!(
            eval(&negative, &context),
            Err(EvaluationError::IndexOutOfBounds { index: -1, size: 3 })
        );
    }

    #[test]
    fn test_conditional() {
        let context = EvaluationContext::new();
        let expr = ExpressionNode::conditional(
            ExpressionNode::literal(LiteralValue::Boolean(true)),
            int(1),
            Some(int(2)),
        );
        assert_eq!(eval(&expr, &context).unwrap(), GaleValue::Integer(1));

        let no_else = ExpressionNode::conditional(
            ExpressionNode::literal(LiteralValue::Boolean(false)),
            int(1),
            None,
        );
        assert_eq!(eval(&no_else, &context).unwrap(), GaleValue::Null);
    }

    #[test]
    fn test_nesting_depth_is_enforced() {
        let mut tree = int(1);
        for _ in 0..64 {
            tree = ExpressionNode::unary_op(UnaryOperator::Minus, tree);
        }
        let options = EngineOptions {
            max_nesting_depth: 16,
            ..EngineOptions::default()
        };
        let functions = create_standard_registry();
        let result = Evaluator::new(&options, &functions)
            .evaluate(&tree, &EvaluationContext::new());
        assert_eq!(result, Err(EvaluationError::NestingTooDeep { max: 16 }));
    }
}
