//! Parameter source specifiers
//!
//! A specifier has the form `<source>:<key>`:
//!
//! | source              | key                  | reads from                      |
//! |---------------------|----------------------|---------------------------------|
//! | `cxt`, `context`    | context key          | the live execution context      |
//! | `path`, `url`       | segment index        | request path segments           |
//! | `query`, `get`      | field name           | request query fields            |
//! | `post`, `form`      | field name           | request form fields             |
//! | `env`               | variable name        | process environment             |
//! | anything else       | key                  | the key/value datasource of that name |

use std::fmt;
use std::str::FromStr;

use crate::errors::RouteError;

/// Where a parameter binding looks for its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Context(String),
    Path(usize),
    Query(String),
    Form(String),
    Env(String),
    Datasource { name: String, key: String },
}

impl Source {
    /// Parse a whitespace-separated list of specifiers, preserving order
    ///
    /// # Errors
    ///
    /// Returns `InvalidSource` for the first malformed specifier.
    pub fn parse_list(specs: &str) -> Result<Vec<Source>, RouteError> {
        specs.split_whitespace().map(str::parse).collect()
    }
}

impl FromStr for Source {
    type Err = RouteError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RouteError::InvalidSource {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (name, key) = spec
            .split_once(':')
            .ok_or_else(|| invalid("expected <source>:<key>"))?;
        if name.is_empty() {
            return Err(invalid("source name is empty"));
        }
        if key.is_empty() {
            return Err(invalid("key is empty"));
        }

        let source = match name {
            "cxt" | "context" => Source::Context(key.to_string()),
            "path" | "url" => Source::Path(
                key.parse()
                    .map_err(|_| invalid("path key must be a segment index"))?,
            ),
            "query" | "get" => Source::Query(key.to_string()),
            "post" | "form" => Source::Form(key.to_string()),
            "env" => Source::Env(key.to_string()),
            other => Source::Datasource {
                name: other.to_string(),
                key: key.to_string(),
            },
        };
        Ok(source)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Context(key) => write!(f, "cxt:{key}"),
            Source::Path(index) => write!(f, "path:{index}"),
            Source::Query(key) => write!(f, "query:{key}"),
            Source::Form(key) => write!(f, "post:{key}"),
            Source::Env(key) => write!(f, "env:{key}"),
            Source::Datasource { name, key } => write!(f, "{name}:{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_sources() {
        assert_eq!("cxt:msg".parse(), Ok(Source::Context("msg".to_string())));
        assert_eq!("context:msg".parse(), Ok(Source::Context("msg".to_string())));
        assert_eq!("path:1".parse(), Ok(Source::Path(1)));
        assert_eq!("get:q".parse(), Ok(Source::Query("q".to_string())));
        assert_eq!("post:foo".parse(), Ok(Source::Form("foo".to_string())));
        assert_eq!("env:HOME".parse(), Ok(Source::Env("HOME".to_string())));
    }

    #[test]
    fn test_unknown_prefix_names_datasource() {
        assert_eq!(
            "settings:theme".parse(),
            Ok(Source::Datasource {
                name: "settings".to_string(),
                key: "theme".to_string(),
            })
        );
    }

    #[test]
    fn test_key_may_contain_colons() {
        assert_eq!(
            "cxt:a:b".parse(),
            Ok(Source::Context("a:b".to_string()))
        );
    }

    #[test]
    fn test_malformed_specs_rejected() {
        for spec in ["msg", ":msg", "cxt:", "path:one"] {
            assert!(
                matches!(spec.parse::<Source>(), Err(RouteError::InvalidSource { .. })),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let sources = Source::parse_list("cxt:msg  path:1 post:foo").unwrap();
        assert_eq!(
            sources,
            vec![
                Source::Context("msg".to_string()),
                Source::Path(1),
                Source::Form("foo".to_string()),
            ]
        );
        assert_eq!(sources[2].to_string(), "post:foo");
    }
}
