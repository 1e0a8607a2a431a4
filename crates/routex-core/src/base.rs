//! Process-wide base context
//!
//! Built once at start-up and handed to the [`Router`](crate::Router). Every
//! execution starts from [`BaseContext::new_context`], a shallow copy, so
//! request-scoped writes never reach the base while datasources and loggers
//! stay shared.

use std::any::Any;
use std::sync::Arc;

use crate::context::Context;
use crate::datasource::KeyValueDatasource;
use crate::logger::LogSink;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct BaseContext {
    cxt: Context,
}

impl BaseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a default value visible to every execution
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cxt.add(key, value);
        self
    }

    pub fn with_datasource<T: Any + Send + Sync>(self, name: impl Into<String>, handle: Arc<T>) -> Self {
        self.cxt.add_datasource(name, handle);
        self
    }

    /// Register a datasource that binding specifiers can address by `name`
    pub fn with_key_value_datasource<T>(self, name: impl Into<String>, handle: Arc<T>) -> Self
    where
        T: KeyValueDatasource + 'static,
    {
        self.cxt.add_key_value_datasource(name, handle);
        self
    }

    pub fn with_logger(self, name: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        self.cxt.add_logger(name, sink);
        self
    }

    /// The base store itself; its datasource and logger tables can still be
    /// changed through `&self`
    pub fn context(&self) -> &Context {
        &self.cxt
    }

    /// A fresh per-execution store
    pub fn new_context(&self) -> Context {
        self.cxt.copy()
    }
}

impl From<Context> for BaseContext {
    fn from(cxt: Context) -> Self {
        Self { cxt }
    }
}
