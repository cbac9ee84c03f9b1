//! Compile-time variable metadata
//!
//! Every compiled expression carries a registry describing the variables its
//! tree references. The registry is built once at compile time by scanning
//! the tree and is never mutated afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::expression::{ExpressionNode, LiteralValue};

/// One segment of a variable reference path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Property access by name (`a.b`)
    Property(String),
    /// Index access with a constant index (`a[0]`)
    Index(i64),
}

/// Compile-time metadata for one variable referenced by an expression tree
///
/// A nested reference records its full path, so `a` and `a.b` are distinct
/// entries. Equality and hashing are by `name` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableMeta {
    name: String,
    path: Vec<PathSegment>,
    assignment_target: bool,
}

impl VariableMeta {
    /// Create metadata for a plain (non-nested) variable reference
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vec![PathSegment::Property(name.clone())],
            name,
            assignment_target: false,
        }
    }

    /// Create metadata from a full reference path
    pub fn from_path(path: Vec<PathSegment>) -> Self {
        Self {
            name: render_name(&path),
            path,
            assignment_target: false,
        }
    }

    /// Mark whether this variable is the target of an assignment form.
    /// Tree producers with assignment syntax set this; the evaluation core
    /// itself never writes into the context.
    pub fn assignment_target(mut self, yes: bool) -> Self {
        self.assignment_target = yes;
        self
    }

    /// Full dotted/indexed name of the reference (`x`, `y.z`, `a[0].b`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reference path, one segment per access
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Whether this variable is the target of an assignment form
    pub fn is_assignment_target(&self) -> bool {
        self.assignment_target
    }
}

impl PartialEq for VariableMeta {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for VariableMeta {}

impl Hash for VariableMeta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for VariableMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn render_name(path: &[PathSegment]) -> String {
    let mut name = String::new();
    for segment in path {
        match segment {
            PathSegment::Property(property) => {
                if !name.is_empty() {
                    name.push('.');
                }
                name.push_str(property);
            }
            PathSegment::Index(index) => {
                name.push('[');
                name.push_str(&index.to_string());
                name.push(']');
            }
        }
    }
    name
}

/// Scan a tree for variable references, left to right, depth first.
///
/// Entries are deduplicated by name; a variable referenced several times
/// keeps its first-occurrence position. A `Path`/`Index` chain rooted at a
/// variable whose indices are integer literals folds into a single
/// full-path entry; a dynamic index breaks the chain, recording the root
/// and scanning the index expression separately.
pub fn collect_variables(root: &ExpressionNode) -> Vec<VariableMeta> {
    let mut seen: IndexMap<String, VariableMeta> = IndexMap::new();
    walk(root, &mut seen);
    seen.into_values().collect()
}

fn walk(node: &ExpressionNode, seen: &mut IndexMap<String, VariableMeta>) {
    if let Some(path) = reference_path(node) {
        let meta = VariableMeta::from_path(path);
        seen.entry(meta.name().to_string()).or_insert(meta);
        return;
    }
    match node {
        ExpressionNode::Literal(_) | ExpressionNode::Variable(_) => {}
        ExpressionNode::UnaryOp { operand, .. } => walk(operand, seen),
        ExpressionNode::BinaryOp { left, right, .. } => {
            walk(left, seen);
            walk(right, seen);
        }
        ExpressionNode::FunctionCall { args, .. } => {
            for arg in args {
                walk(arg, seen);
            }
        }
        ExpressionNode::Path { base, .. } => walk(base, seen),
        ExpressionNode::Index { base, index } => {
            walk(base, seen);
            walk(index, seen);
        }
        ExpressionNode::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            walk(condition, seen);
            walk(then_expr, seen);
            if let Some(else_expr) = else_expr {
                walk(else_expr, seen);
            }
        }
    }
}

// A fully static reference chain: a Variable root followed by property
// accesses and integer-literal indices. Anything else is not a single
// reference and must be scanned node by node.
fn reference_path(node: &ExpressionNode) -> Option<Vec<PathSegment>> {
    match node {
        ExpressionNode::Variable(name) => Some(vec![PathSegment::Property(name.clone())]),
        ExpressionNode::Path { base, path } => {
            let mut segments = reference_path(base)?;
            segments.push(PathSegment::Property(path.clone()));
            Some(segments)
        }
        ExpressionNode::Index { base, index } => {
            let mut segments = reference_path(base)?;
            match index.as_ref() {
                ExpressionNode::Literal(LiteralValue::Integer(i)) => {
                    segments.push(PathSegment::Index(*i));
                    Some(segments)
                }
                _ => None,
            }
        }
        _ => None,
    }
}
