//! Evaluation context for Gale expressions

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use super::trace::TraceSink;
use crate::model::GaleValue;

/// Per-call environment for evaluating a compiled expression
///
/// The context maps variable names to values and carries the two reserved
/// tracing controls: an enable flag (default off) and an optional sink.
/// The controls live apart from the variable map, so user variables can
/// never collide with them. A context is built by the caller before a call
/// and is read-only from the tree's perspective; it is never shared between
/// concurrent evaluations.
#[derive(Clone, Default)]
pub struct EvaluationContext {
    /// Variable bindings visible to the expression
    variables: FxHashMap<String, GaleValue>,
    /// Whether nodes emit trace lines during this evaluation
    trace_enabled: bool,
    /// Trace destination; falls back to the engine's default sink when unset
    trace_sink: Option<Arc<dyn TraceSink>>,
}

impl EvaluationContext {
    /// Create an empty context with tracing disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable in the context
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<GaleValue>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`set_variable`](Self::set_variable)
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<GaleValue>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Get a variable from the context
    pub fn get_variable(&self, name: &str) -> Option<&GaleValue> {
        self.variables.get(name)
    }

    /// Number of variables bound in the context
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Enable or disable tracing for this call
    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    /// Set the trace destination for this call
    pub fn set_trace_sink(&mut self, sink: Arc<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    /// Builder-style helper enabling tracing into the given sink
    pub fn with_tracing(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.set_trace_enabled(true);
        self.set_trace_sink(sink);
        self
    }

    /// Whether tracing is enabled for this call
    pub fn is_trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    /// The trace destination, if one was supplied
    pub fn trace_sink(&self) -> Option<&Arc<dyn TraceSink>> {
        self.trace_sink.as_ref()
    }
}

impl FromIterator<(String, GaleValue)> for EvaluationContext {
    fn from_iter<T: IntoIterator<Item = (String, GaleValue)>>(iter: T) -> Self {
        Self {
            variables: iter.into_iter().collect(),
            trace_enabled: false,
            trace_sink: None,
        }
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("variables", &self.variables)
            .field("trace_enabled", &self.trace_enabled)
            .field("trace_sink", &self.trace_sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_defaults_off() {
        let context = EvaluationContext::new();
        assert!(!context.is_trace_enabled());
        assert!(context.trace_sink().is_none());
    }

    #[test]
    fn test_variable_binding() {
        let context = EvaluationContext::new()
            .with_variable("x", 1i64)
            .with_variable("name", "gale");
        assert_eq!(context.get_variable("x"), Some(&GaleValue::Integer(1)));
        assert_eq!(
            context.get_variable("name"),
            Some(&GaleValue::String("gale".into()))
        );
        assert_eq!(context.get_variable("missing"), None);
        assert_eq!(context.variable_count(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let context: EvaluationContext =
            [("a".to_string(), GaleValue::Integer(1))].into_iter().collect();
        assert_eq!(context.get_variable("a"), Some(&GaleValue::Integer(1)));
        assert!(!context.is_trace_enabled());
    }
}
