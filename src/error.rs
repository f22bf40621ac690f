//! Error types reported by registries and configuration loading.
//!
//! Lookups never fail; a missing entity is reported as `None` or the [`UNASSIGNED`] ID.
//!
//! [`UNASSIGNED`]: crate::UNASSIGNED

use std::io;
use std::path::PathBuf;

/// Errors raised by registry mutations and persistence.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An entity without an ID was inserted where its ID was expected to be known.
    #[error("cannot insert {0}: entity has no id")]
    UnassignedId(String),
    /// Persisted content contained the same ID twice under [`DuplicatePolicy::Reject`].
    ///
    /// [`DuplicatePolicy::Reject`]: crate::DuplicatePolicy::Reject
    #[error("duplicate entity id {0} in persisted content")]
    DuplicateId(u32),
    /// Persisted content could not be encoded or decoded.
    #[error("cannot process index content: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading or saving a [`Config`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}
