//! Step-scoped parameter view
//!
//! The router resolves every binding of a step before invoking it and hands
//! the command a read-only [`Params`]. A binding that matched no source and
//! declared no default is recorded as [`Value::Null`] with origin
//! [`ParamOrigin::Unresolved`]; `has` reports it as absent, so typed getters
//! fall back to the caller's default.
//!
//! `Null` never binds: a source holding a stored `Null` is skipped during
//! resolution and the next specifier (or the default) is tried instead.

use std::collections::HashMap;

use crate::errors::RouteError;
use crate::getter::Getter;
use crate::source::Source;
use crate::value::Value;

/// Which source answered a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamOrigin {
    Source(Source),
    Default,
    Unresolved,
}

/// Resolved parameters for one step
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, Value>,
    origins: HashMap<String, ParamOrigin>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view from literal pairs, as if every value came from a default
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut params = Params::new();
        for (name, value) in pairs {
            params.insert(name.into(), value.into(), ParamOrigin::Default);
        }
        params
    }

    pub(crate) fn insert(&mut self, name: String, value: Value, origin: ParamOrigin) {
        self.origins.insert(name.clone(), origin);
        self.values.insert(name, value);
    }

    /// Where the named parameter was resolved from
    pub fn origin(&self, name: &str) -> Option<&ParamOrigin> {
        self.origins.get(name)
    }

    /// The source specifier that answered `name`; `None` for defaults and
    /// unresolved bindings
    pub fn get_source(&self, name: &str) -> Option<&Source> {
        match self.origins.get(name)? {
            ParamOrigin::Source(source) => Some(source),
            ParamOrigin::Default | ParamOrigin::Unresolved => None,
        }
    }

    /// Check that every name resolved to a non-null value
    ///
    /// # Errors
    ///
    /// Returns `MissingParams` listing the unresolved names in the order given.
    pub fn requires(&self, names: &[&str]) -> Result<(), RouteError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.has(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RouteError::MissingParams { names: missing })
        }
    }

    /// Number of declared bindings, resolved or not
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared binding names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Getter for Params {
    fn has(&self, key: &str) -> Option<Value> {
        self.values.get(key).filter(|v| !v.is_null()).cloned()
    }
}
