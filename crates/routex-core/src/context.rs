//! Per-execution value store
//!
//! A [`Context`] maps string keys to [`Value`]s and carries two shared
//! tables: datasources and loggers. [`Context::copy`] produces a shallow
//! snapshot:
//!
//! - top-level bindings are independent afterwards: `add`/`remove` on one
//!   side never changes the other's key set;
//! - [`Value::Shared`] handles point at the same allocation in both;
//! - the datasource and logger tables are the same tables in both.
//!
//! ```
//! use routex_core::Context;
//!
//! let mut base = Context::new();
//! base.add("greeting", "hello");
//!
//! let mut request = base.copy();
//! request.add("user", "ada");
//!
//! assert_eq!(base.len(), 1);
//! assert_eq!(request.len(), 2);
//! ```

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError};

use crate::datasource::{GettableDatasource, KeyValueDatasource, SharedDatasources};
use crate::errors::{Result, RouteError};
use crate::getter::Getter;
use crate::logger::{LogSink, SharedLoggers};
use crate::value::Value;

/// Mutable key/value store shared by the steps of one execution
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
    datasources: SharedDatasources,
    loggers: SharedLoggers,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Fetch `key`
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if nothing is stored under `key`. A stored
    /// `Value::Null` or empty string is present and returned as-is.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| RouteError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Presence test; never fails
    pub fn has(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    /// Borrow the stored value without cloning it
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Remove `key`; removing an absent key is a no-op
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow snapshot; see the module documentation
    pub fn copy(&self) -> Context {
        self.clone()
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Snapshot of all bindings, ordered by key
    pub fn as_map(&self) -> BTreeMap<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ----- datasources -----

    /// Register a datasource handle; visible through every copy of this context
    pub fn add_datasource<T: Any + Send + Sync>(&self, name: impl Into<String>, handle: Arc<T>) {
        self.datasources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(name, handle);
    }

    /// Register a datasource that bindings can probe by name
    pub fn add_key_value_datasource<T>(&self, name: impl Into<String>, handle: Arc<T>)
    where
        T: KeyValueDatasource + Any,
    {
        self.datasources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_key_value(name, handle);
    }

    pub fn remove_datasource(&self, name: &str) {
        self.datasources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    /// Typed datasource lookup; `None` when absent or of another type
    pub fn datasource<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.datasources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>(name)
    }

    pub fn has_datasource(&self, name: &str) -> bool {
        self.datasources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Getter view over a key/value datasource
    pub fn key_value_datasource(&self, name: &str) -> Option<GettableDatasource> {
        self.datasources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .gettable(name)
    }

    pub fn datasource_names(&self) -> Vec<String> {
        self.datasources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
    }

    // ----- loggers -----

    /// Register a log sink; re-using a name replaces the sink in place
    pub fn add_logger(&self, name: impl Into<String>, sink: Arc<dyn LogSink>) {
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(name, sink);
    }

    pub fn remove_logger(&self, name: &str) {
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    pub fn logger(&self, name: &str) -> Option<Arc<dyn LogSink>> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
    }

    /// Logger names in fan-out order
    pub fn logger_names(&self) -> Vec<String> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
    }

    /// Send a line to every registered sink, in registration order
    pub fn log(&self, prefix: &str, message: &str) {
        // Snapshot first so a sink may touch the registry without deadlocking.
        let sinks = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sinks();
        for sink in sinks {
            sink.log(prefix, message);
        }
    }

    /// Formatted variant of [`Context::log`]
    ///
    /// ```
    /// use std::sync::Arc;
    /// use routex_core::{Context, MemorySink};
    ///
    /// let cxt = Context::new();
    /// let sink = Arc::new(MemorySink::new());
    /// cxt.add_logger("mem", sink.clone());
    /// cxt.logf("info", format_args!("{} steps", 3));
    /// assert_eq!(sink.lines()[0].message, "3 steps");
    /// ```
    pub fn logf(&self, prefix: &str, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) => self.log(prefix, s),
            None => self.log(prefix, &args.to_string()),
        }
    }
}

impl Getter for Context {
    fn has(&self, key: &str) -> Option<Value> {
        Context::has(self, key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.as_map())
            .field("datasources", &self.datasource_names())
            .field("loggers", &self.logger_names())
            .finish()
    }
}
