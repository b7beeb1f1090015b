//! Filter and observer configuration
//!
//! Configuration can be loaded from a TOML or JSON file; every field has a
//! default, so an empty file is a valid configuration.
//!
//! ```toml
//! [filter]
//! brightness_bias = 6
//! target_u = 100
//! target_v = 160
//! blend_factor = 0.75
//!
//! [observer]
//! enabled = true
//! stats_interval = 300
//! ```

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::filter::SepiaParams;
use crate::Result;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Sepia tint parameters
    #[serde(default)]
    pub filter: SepiaParams,

    /// Capture observer behavior
    #[serde(default)]
    pub observer: ObserverConfig,
}

/// Capture observer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObserverConfig {
    /// Filter captured frames; when false frames pass through untouched
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Log frame counters every N frames (0 disables)
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_stats_interval() -> u64 {
    300
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            stats_interval: default_stats_interval(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as TOML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            _ => Self::from_toml_str(&contents)?,
        };
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()
    }

    /// JSON schema describing this configuration
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Config)
    }
}
