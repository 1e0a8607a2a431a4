//! Router configuration (TOML)
//!
//! Every field is optional in the file; missing fields take the defaults
//! below.
//!
//! ```toml
//! max_reroutes = 8
//! log_profile = "production"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Result, RouteError};
use crate::logging_facility::Profile;

/// Hop limit used when the configuration does not set one
pub const DEFAULT_MAX_REROUTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Reroutes allowed within one execution; `0` forbids rerouting
    pub max_reroutes: usize,

    /// Profile passed to `logging_facility::init` by hosts that let the
    /// configuration choose it
    pub log_profile: Profile,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_reroutes: DEFAULT_MAX_REROUTES,
            log_profile: Profile::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown fields or values of
    /// the wrong type.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `InvalidConfig` if it does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| RouteError::Io {
            reason: format!("read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            RouteError::InvalidConfig { reason } => RouteError::InvalidConfig {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    pub fn with_max_reroutes(mut self, max_reroutes: usize) -> Self {
        self.max_reroutes = max_reroutes;
        self
    }
}
