//! Named external-resource handles attached to a context
//!
//! A datasource is any long-lived handle a command needs (a connection pool,
//! a client, a settings table). The registry stores it type-erased and hands
//! it back typed through [`Context::datasource`](crate::Context::datasource).
//!
//! Datasources that also implement [`KeyValueDatasource`] can be addressed
//! from parameter bindings by their registry name: a binding sourced from
//! `"settings:theme"` probes the `settings` datasource for `theme`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::getter::Getter;
use crate::value::Value;

/// A datasource that can answer key lookups
pub trait KeyValueDatasource: Send + Sync {
    /// Return the value stored under `key`; `None` or `Value::Null` mean absent
    fn value(&self, key: &str) -> Option<Value>;
}

/// Adapts a [`KeyValueDatasource`] to the [`Getter`] interface
#[derive(Clone)]
pub struct GettableDatasource {
    inner: Arc<dyn KeyValueDatasource>,
}

impl GettableDatasource {
    pub fn new(inner: Arc<dyn KeyValueDatasource>) -> Self {
        Self { inner }
    }
}

impl Getter for GettableDatasource {
    fn has(&self, key: &str) -> Option<Value> {
        self.inner.value(key).filter(|v| !v.is_null())
    }
}

impl std::fmt::Debug for GettableDatasource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GettableDatasource")
    }
}

/// In-memory key/value datasource
///
/// Interior mutability lets a process update settings after the datasource
/// was registered; every context sharing the registry sees the update.
#[derive(Debug, Default)]
pub struct MapDatasource {
    values: RwLock<HashMap<String, Value>>,
}

impl MapDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl KeyValueDatasource for MapDatasource {
    fn value(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[derive(Clone)]
struct Entry {
    handle: Arc<dyn Any + Send + Sync>,
    key_value: Option<Arc<dyn KeyValueDatasource>>,
}

/// Name → handle table shared by a base context and all its copies
#[derive(Clone, Default)]
pub struct DatasourceRegistry {
    entries: HashMap<String, Entry>,
}

impl DatasourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an opaque handle; last write wins
    pub fn add<T: Any + Send + Sync>(&mut self, name: impl Into<String>, handle: Arc<T>) {
        self.entries.insert(
            name.into(),
            Entry {
                handle,
                key_value: None,
            },
        );
    }

    /// Register a handle that can also be probed from parameter bindings
    pub fn add_key_value<T>(&mut self, name: impl Into<String>, handle: Arc<T>)
    where
        T: KeyValueDatasource + Any,
    {
        let key_value: Arc<dyn KeyValueDatasource> = handle.clone();
        self.entries.insert(
            name.into(),
            Entry {
                handle,
                key_value: Some(key_value),
            },
        );
    }

    /// Remove a handle; removing an absent name is a no-op
    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// Typed access; `None` if absent or registered under another type
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.entries
            .get(name)
            .and_then(|e| e.handle.clone().downcast::<T>().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Getter view over a key/value datasource
    pub fn gettable(&self, name: &str) -> Option<GettableDatasource> {
        self.entries
            .get(name)
            .and_then(|e| e.key_value.clone())
            .map(GettableDatasource::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for DatasourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Shared handle to a registry
pub(crate) type SharedDatasources = Arc<RwLock<DatasourceRegistry>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pool {
        name: String,
    }

    #[test]
    fn test_add_get_remove() {
        let mut registry = DatasourceRegistry::new();
        registry.add(
            "db",
            Arc::new(Pool {
                name: "primary".to_string(),
            }),
        );

        let pool = registry.get::<Pool>("db").unwrap();
        assert_eq!(pool.name, "primary");
        assert!(registry.get::<String>("db").is_none());

        registry.remove("db");
        registry.remove("db");
        assert!(registry.get::<Pool>("db").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = DatasourceRegistry::new();
        registry.add("x", Arc::new(1u32));
        registry.add("x", Arc::new(2u32));
        assert_eq!(registry.len(), 1);
        assert_eq!(*registry.get::<u32>("x").unwrap(), 2);
    }

    #[test]
    fn test_key_value_datasource_is_gettable() {
        let mut registry = DatasourceRegistry::new();
        let settings = Arc::new(MapDatasource::new().with("theme", "dark"));
        registry.add_key_value("settings", settings.clone());

        let getter = registry.gettable("settings").unwrap();
        assert_eq!(getter.has("theme"), Some(Value::from("dark")));
        assert_eq!(getter.has("missing"), None);

        settings.insert("theme", "light");
        assert_eq!(getter.has("theme"), Some(Value::from("light")));

        assert!(registry.get::<MapDatasource>("settings").is_some());
    }

    #[test]
    fn test_null_value_is_absent() {
        let ds = GettableDatasource::new(Arc::new(MapDatasource::new().with("k", Value::Null)));
        assert_eq!(ds.has("k"), None);
        assert_eq!(ds.get("k", Value::from("d")), Value::from("d"));
    }

    #[test]
    fn test_opaque_handle_not_gettable() {
        let mut registry = DatasourceRegistry::new();
        registry.add("raw", Arc::new(5u8));
        assert!(registry.gettable("raw").is_none());
    }
}
