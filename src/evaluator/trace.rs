//! Execution tracing
//!
//! Tracing is a capability threaded through the execution context, not a
//! process-wide switch. When the context enables it, every node emits two
//! ordered lines around its own evaluation: one announcing the node's
//! source form, one reporting the value it produced.

use parking_lot::Mutex;
use std::io;

/// Destination for diagnostic lines emitted during traced evaluation
///
/// Emission failures are discarded at the point of emission and never
/// influence the evaluation result.
pub trait TraceSink: Send + Sync {
    /// Emit one trace line
    fn emit(&self, line: &str) -> io::Result<()>;
}

/// Sink that forwards trace lines to the `log` facade at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn emit(&self, line: &str) -> io::Result<()> {
        log::trace!(target: "gale_expr::trace", "{line}");
        Ok(())
    }
}

/// Sink that buffers trace lines in memory for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    /// Create an empty collecting sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines collected so far, in emission order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines collected so far
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Check whether no lines have been collected
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl TraceSink for CollectingSink {
    fn emit(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}
