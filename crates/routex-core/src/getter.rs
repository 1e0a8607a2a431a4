//! Uniform read interface over contexts, parameter views and datasources
//!
//! A [`Getter`] answers two questions: "what is under this key, or else this
//! default" ([`Getter::get`]) and "is there anything under this key"
//! ([`Getter::has`]). Typed accessors live on [`GetterExt`], which every
//! getter receives through a blanket impl.
//!
//! The typed accessors are deliberately asymmetric:
//!
//! - `get_*` fails with [`RouteError::TypeMismatch`] when the value found is
//!   of another type, so a misconfigured binding is loud.
//! - `has_*` treats a value of another type as absent.
//!
//! ```
//! use routex_core::{Context, GetterExt};
//!
//! let mut cxt = Context::new();
//! cxt.add("answer", 42isize);
//!
//! assert_eq!(cxt.get_int("answer", 0).unwrap(), 42);
//! assert!(cxt.get_string("answer", "").is_err());
//! assert_eq!(cxt.has_string("answer"), None);
//! ```

use crate::errors::{Result, RouteError};
use crate::value::Value;

/// Read interface shared by every value source
pub trait Getter {
    /// Look up `key`, falling back to `default` on a miss. Never fails.
    fn get(&self, key: &str, default: Value) -> Value {
        self.has(key).unwrap_or(default)
    }

    /// Look up `key`, reporting presence
    fn has(&self, key: &str) -> Option<Value>;
}

impl<G: Getter + ?Sized> Getter for &G {
    fn get(&self, key: &str, default: Value) -> Value {
        (**self).get(key, default)
    }

    fn has(&self, key: &str) -> Option<Value> {
        (**self).has(key)
    }
}

macro_rules! typed_accessors {
    ($(
        $(#[$meta:meta])*
        $get:ident, $has:ident => $ty:ty, $dty:ty, $variant:ident, $label:literal;
    )*) => {
        /// Typed convenience accessors available on every [`Getter`]
        pub trait GetterExt: Getter {
            $(
                $(#[$meta])*
                fn $get(&self, key: &str, default: $dty) -> Result<$ty> {
                    match self.get(key, Value::from(default)) {
                        Value::$variant(v) => Ok(v),
                        other => Err(RouteError::TypeMismatch {
                            key: key.to_string(),
                            expected: $label,
                            found: other.type_name(),
                        }),
                    }
                }

                fn $has(&self, key: &str) -> Option<$ty> {
                    match self.has(key)? {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    /// Get a string, or `default` when the key is absent
    get_string, has_string => String, &str, Str, "string";
    get_bool, has_bool => bool, bool, Bool, "bool";
    /// Get a platform-sized integer
    get_int, has_int => isize, isize, Int, "int";
    get_int32, has_int32 => i32, i32, Int32, "int32";
    get_int64, has_int64 => i64, i64, Int64, "int64";
    get_uint64, has_uint64 => u64, u64, Uint64, "uint64";
    get_float64, has_float64 => f64, f64, Float64, "float64";
}

impl<G: Getter + ?Sized> GetterExt for G {}

/// A getter that holds one value and reports it for every key
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultGetter {
    value: Value,
}

impl DefaultGetter {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Getter for DefaultGetter {
    fn get(&self, _key: &str, _default: Value) -> Value {
        self.value.clone()
    }

    fn has(&self, _key: &str) -> Option<Value> {
        Some(self.value.clone())
    }
}

/// Where a [`get_from_first`] lookup was answered from
pub enum Origin<'a> {
    /// The source at `index` in the probed list
    Source {
        index: usize,
        getter: &'a dyn Getter,
    },
    /// No source matched; the default was used
    Default(DefaultGetter),
}

impl Origin<'_> {
    pub fn is_default(&self) -> bool {
        matches!(self, Origin::Default(_))
    }

    /// Index of the matching source, if any matched
    pub fn index(&self) -> Option<usize> {
        match self {
            Origin::Source { index, .. } => Some(*index),
            Origin::Default(_) => None,
        }
    }
}

impl Getter for Origin<'_> {
    fn get(&self, key: &str, default: Value) -> Value {
        match self {
            Origin::Source { getter, .. } => getter.get(key, default),
            Origin::Default(d) => d.get(key, default),
        }
    }

    fn has(&self, key: &str) -> Option<Value> {
        match self {
            Origin::Source { getter, .. } => getter.has(key),
            Origin::Default(d) => d.has(key),
        }
    }
}

impl std::fmt::Debug for Origin<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Source { index, .. } => write!(f, "Origin::Source({index})"),
            Origin::Default(d) => write!(f, "Origin::Default({:?})", d.value()),
        }
    }
}

/// Resolve `key` against `sources` in order, returning the first hit
///
/// On a total miss the default is returned together with a [`DefaultGetter`]
/// that reports the default as present.
pub fn get_from_first<'a>(
    key: &str,
    default: Value,
    sources: &[&'a dyn Getter],
) -> (Value, Origin<'a>) {
    for (index, getter) in sources.iter().copied().enumerate() {
        if let Some(value) = getter.has(key) {
            return (value, Origin::Source { index, getter });
        }
    }
    (default.clone(), Origin::Default(DefaultGetter::new(default)))
}
