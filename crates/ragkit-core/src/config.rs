//! `RagKit` configuration module.
//!
//! Provides configuration via `ragkit.toml` and environment variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`RAGKIT_*`)
//! 2. Configuration file (`ragkit.toml`)
//! 3. Default values

use crate::error::{Error, Result};
use crate::vector::VectorBackend;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vector store selection for datasets without a stored index structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Default backend for new datasets. Required unless every dataset
    /// carries a stored index structure.
    pub backend: Option<VectorBackend>,

    /// Enables the tenant whitelist override.
    pub whitelist_enable: bool,

    /// Tenants routed to the managed `tidb_on_qdrant` backend when the
    /// whitelist is enabled.
    pub whitelist_tenants: Vec<String>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            whitelist_enable: false,
            whitelist_tenants: Vec::new(),
        }
    }
}

impl VectorStoreConfig {
    /// Loads configuration from `ragkit.toml` and `RAGKIT_*` environment
    /// variables, layered over defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a layer fails to parse.
    pub fn load() -> Result<Self> {
        Self::extract(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("ragkit.toml"))
            .merge(Env::prefixed("RAGKIT_")))
    }

    /// Loads configuration from a specific file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a layer fails to parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("RAGKIT_")))
    }

    /// True when the tenant is routed to the whitelist backend.
    #[must_use]
    pub fn is_whitelisted(&self, tenant_id: &str) -> bool {
        self.whitelist_enable && self.whitelist_tenants.iter().any(|t| t == tenant_id)
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|err| Error::Config(err.to_string()))
    }
}
