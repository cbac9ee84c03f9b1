//! Expression AST node definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::operator::{BinaryOperator, UnaryOperator};
use super::variable::{VariableMeta, collect_variables};

/// AST representation of Gale expressions
///
/// A tree of these nodes is the unit a compiler hands to
/// [`GaleEngine::compile`](crate::engine::GaleEngine::compile). Children are
/// exclusively owned by their parent; nodes never mutate after construction,
/// which is what makes a compiled tree safe to evaluate from many threads
/// at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionNode {
    /// Literal value with a fixed result (string, number, boolean, null)
    Literal(LiteralValue),

    /// Reference to a variable in the execution context
    Variable(String),

    /// Unary operation (negation, not)
    UnaryOp {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<ExpressionNode>,
    },

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        /// The operator
        op: BinaryOperator,
        /// Left operand
        left: Box<ExpressionNode>,
        /// Right operand
        right: Box<ExpressionNode>,
    },

    /// Function call with name and arguments
    FunctionCall {
        /// Function name, resolved against the engine's registry
        name: String,
        /// Function arguments, evaluated left to right
        args: Vec<ExpressionNode>,
    },

    /// Property navigation (object.property)
    Path {
        /// Base expression
        base: Box<ExpressionNode>,
        /// Property name
        path: String,
    },

    /// Index access (array[index])
    Index {
        /// Base expression
        base: Box<ExpressionNode>,
        /// Index expression
        index: Box<ExpressionNode>,
    },

    /// Conditional expression (condition ? then : else)
    Conditional {
        /// Condition, must evaluate to a boolean
        condition: Box<ExpressionNode>,
        /// Then branch
        then_expr: Box<ExpressionNode>,
        /// Else branch; a missing branch yields null
        else_expr: Option<Box<ExpressionNode>>,
    },
}

/// Literal values in Gale expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// Boolean literal
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Decimal literal with exact precision
    Decimal(Decimal),
    /// String literal
    String(String),
    /// Null literal
    Null,
}

impl ExpressionNode {
    /// Create a literal expression
    pub fn literal(value: LiteralValue) -> Self {
        Self::Literal(value)
    }

    /// Create a variable reference expression
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOperator, operand: ExpressionNode) -> Self {
        Self::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a function call expression
    pub fn function_call(name: impl Into<String>, args: Vec<ExpressionNode>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Create a property navigation expression
    pub fn path(base: ExpressionNode, path: impl Into<String>) -> Self {
        Self::Path {
            base: Box::new(base),
            path: path.into(),
        }
    }

    /// Create an index access expression
    pub fn index(base: ExpressionNode, index: ExpressionNode) -> Self {
        Self::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    /// Create a conditional expression
    pub fn conditional(
        condition: ExpressionNode,
        then_expr: ExpressionNode,
        else_expr: Option<ExpressionNode>,
    ) -> Self {
        Self::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: else_expr.map(Box::new),
        }
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Check if this expression is a variable reference
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Get the literal value if this is a literal expression
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Get the variable name if this is a variable reference
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Human-readable rendering of this node's source form
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Metadata for every variable referenced by this node and its
    /// descendants, deduplicated by name in first-occurrence order
    pub fn variables(&self) -> Vec<VariableMeta> {
        collect_variables(self)
    }

    /// Count the total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::Literal(_) | Self::Variable(_) => 0,
            Self::UnaryOp { operand, .. } => operand.node_count(),
            Self::BinaryOp { left, right, .. } => left.node_count() + right.node_count(),
            Self::FunctionCall { args, .. } => args.iter().map(|a| a.node_count()).sum(),
            Self::Path { base, .. } => base.node_count(),
            Self::Index { base, index } => base.node_count() + index.node_count(),
            Self::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.node_count()
                    + then_expr.node_count()
                    + else_expr.as_ref().map_or(0, |e| e.node_count())
            }
        }
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::UnaryOp { op, operand } => write!(f, "{op}{operand}"),
            Self::BinaryOp { op, left, right } => write!(f, "{left} {op} {right}"),
            Self::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Path { base, path } => write!(f, "{base}.{path}"),
            Self::Index { base, index } => write!(f, "{base}[{index}]"),
            Self::Conditional {
                condition,
                then_expr,
                else_expr,
            } => match else_expr {
                Some(else_expr) => write!(f, "{condition} ? {then_expr} : {else_expr}"),
                None => write!(f, "{condition} ? {then_expr} : null"),
            },
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_creation() {
        let literal = ExpressionNode::literal(LiteralValue::Integer(42));
        assert!(literal.is_literal());
        assert_eq!(literal.as_literal(), Some(&LiteralValue::Integer(42)));

        let variable = ExpressionNode::variable("score");
        assert!(variable.is_variable());
        assert_eq!(variable.as_variable(), Some("score"));
    }

    #[test]
    fn test_complex_expression() {
        // Create expression: upper(user.name) + "!"
        let call = ExpressionNode::function_call(
            "upper",
            vec![ExpressionNode::path(
                ExpressionNode::variable("user"),
                "name",
            )],
        );
        let bang = ExpressionNode::literal(LiteralValue::String("!".to_string()));
        let expr = ExpressionNode::binary_op(BinaryOperator::Add, call, bang);

        match &expr {
            ExpressionNode::BinaryOp {
                op: BinaryOperator::Add,
                ..
            } => {}
            other => panic!("expected binary operation, got {other:?}"),
        }
        assert_eq!(expr.node_count(), 5);
    }

    #[test]
    fn test_describe_renders_source_form() {
        let expr = ExpressionNode::binary_op(
            BinaryOperator::Multiply,
            ExpressionNode::variable("x"),
            ExpressionNode::literal(LiteralValue::Integer(3)),
        );
        assert_eq!(expr.describe(), "x * 3");

        let cond = ExpressionNode::conditional(
            ExpressionNode::variable("ok"),
            ExpressionNode::literal(LiteralValue::String("yes".into())),
            None,
        );
        assert_eq!(cond.describe(), "ok ? \"yes\" : null");

        let indexed = ExpressionNode::index(
            ExpressionNode::path(ExpressionNode::variable("a"), "items"),
            ExpressionNode::literal(LiteralValue::Integer(0)),
        );
        assert_eq!(indexed.describe(), "a.items[0]");
    }
}
