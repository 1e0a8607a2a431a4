//! Request-scoped inputs supplied by a transport binding
//!
//! The transport hands the router a [`Request`]: the route identifier it
//! derived (for HTTP, typically `"<METHOD> <path>"`), the path segments, and
//! the query and form fields. The core never parses a wire format.

use std::collections::HashMap;

use routex_core_types::RequestContext;

use crate::getter::Getter;
use crate::value::Value;

/// Inputs for one execution
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub route: String,
    pub path: Vec<String>,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub correlation: RequestContext,
}

impl Request {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Self::default()
        }
    }

    /// Split `path` on `/`, dropping empty segments
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    pub fn with_correlation(mut self, correlation: RequestContext) -> Self {
        self.correlation = correlation;
        self
    }

    pub fn path_segments(&self) -> PathSegments<'_> {
        PathSegments(&self.path)
    }

    pub fn query_fields(&self) -> Fields<'_> {
        Fields(&self.query)
    }

    pub fn form_fields(&self) -> Fields<'_> {
        Fields(&self.form)
    }
}

/// Getter over path segments; keys are decimal indexes
#[derive(Debug, Clone, Copy)]
pub struct PathSegments<'a>(&'a [String]);

impl Getter for PathSegments<'_> {
    fn has(&self, key: &str) -> Option<Value> {
        let index: usize = key.parse().ok()?;
        self.0.get(index).map(Value::from)
    }
}

/// Getter over string fields (query or form)
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(&'a HashMap<String, String>);

impl Getter for Fields<'_> {
    fn has(&self, key: &str) -> Option<Value> {
        self.0.get(key).map(Value::from)
    }
}

/// Getter over the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Getter for Environment {
    fn has(&self, key: &str) -> Option<Value> {
        std::env::var(key).ok().map(Value::from)
    }
}
