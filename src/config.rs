//! Registry settings, loaded from TOML.
//!
//! ```toml
//! vip_ids = "12, 45"
//! duplicate_policy = "reject"
//! dispatcher_name = "selection"
//! ```
//!
//! Every field is optional.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::id;
use crate::registry::persist::DuplicatePolicy;

/// Settings shared by the registries of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// (Debug) Comma-separated IDs of entities flagged for verbose logging.
    pub vip_ids:          String,
    /// How reloading treats an ID that appears more than once.
    pub duplicate_policy: DuplicatePolicy,
    /// Thread name prefix of selection dispatchers.
    pub dispatcher_name:  String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vip_ids:          String::new(),
            duplicate_policy: DuplicatePolicy::default(),
            dispatcher_name:  String::from("selection"),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(source)?) }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> { Ok(toml::to_string(self)?) }

    /// The parsed set of VIP IDs.
    pub fn vip_ids(&self) -> BTreeSet<u32> { id::parse_ids(&self.vip_ids) }
}
