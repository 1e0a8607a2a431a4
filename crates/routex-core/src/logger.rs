//! Named log sinks attached to a context
//!
//! `Context::log` fans a `(prefix, message)` pair out to every sink in
//! registration order. Re-registering a name replaces the sink in place, so
//! the order stays stable.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Destination for context log lines
pub trait LogSink: Send + Sync {
    /// `prefix` is a severity or category such as `"info"` or `"error"`
    fn log(&self, prefix: &str, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn log(&self, prefix: &str, message: &str) {
        self(prefix, message)
    }
}

/// Ordered name → sink table shared by a base context and all its copies
#[derive(Clone, Default)]
pub struct LoggerRegistry {
    sinks: Vec<(String, Arc<dyn LogSink>)>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, sink: Arc<dyn LogSink>) {
        let name = name.into();
        match self.sinks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = sink,
            None => self.sinks.push((name, sink)),
        }
    }

    /// Removing an absent name is a no-op
    pub fn remove(&mut self, name: &str) {
        self.sinks.retain(|(n, _)| n != name);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LogSink>> {
        self.sinks
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
    }

    /// Names in fan-out order
    pub fn names(&self) -> Vec<String> {
        self.sinks.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub(crate) fn sinks(&self) -> Vec<Arc<dyn LogSink>> {
        self.sinks.iter().map(|(_, s)| s.clone()).collect()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

pub(crate) type SharedLoggers = Arc<RwLock<LoggerRegistry>>;

/// Forwards context log lines to `tracing`
///
/// The level follows the prefix: `error`/`fatal` → ERROR, `warn`/`warning` →
/// WARN, `debug` → DEBUG, `trace` → TRACE, anything else → INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, prefix: &str, message: &str) {
        match prefix.to_ascii_lowercase().as_str() {
            "error" | "fatal" => tracing::error!(component = "routex::context", prefix, "{}", message),
            "warn" | "warning" => tracing::warn!(component = "routex::context", prefix, "{}", message),
            "debug" => tracing::debug!(component = "routex::context", prefix, "{}", message),
            "trace" => tracing::trace!(component = "routex::context", prefix, "{}", message),
            _ => tracing::info!(component = "routex::context", prefix, "{}", message),
        }
    }
}

/// One line captured by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub prefix: String,
    pub message: String,
}

/// Collects log lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn log(&self, prefix: &str, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogLine {
                prefix: prefix.to_string(),
                message: message.to_string(),
            });
    }
}
