//! Gale expression evaluator
//!
//! This module provides the recursive evaluation engine, the per-call
//! execution context, and the tracing protocol.

mod context;
mod engine;
mod trace;

pub use context::EvaluationContext;
pub use engine::Evaluator;
pub use trace::{CollectingSink, LogSink, TraceSink};
