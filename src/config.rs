//! Search configuration.
//!
//! A [`SearchConfig`] names the available drivers and the default one. It
//! is usually loaded from JSON:
//!
//! ```json
//! {
//!   "default_driver": "main",
//!   "drivers": {
//!     "main": { "driver": "elastic", "host": "search.internal", "port": 9200, "index": "app" },
//!     "local": { "driver": "memory" },
//!     "off": { "driver": "null" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::driver::elastic::ElasticConfig;
use crate::error::{Result, SearchlightError};

/// Options of the in-memory driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Apply English suffix stemming during analysis.
    pub stemming: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig { stemming: true }
    }
}

impl MemoryConfig {
    /// Analyzer matching these options.
    pub fn analyzer(&self) -> Analyzer {
        if self.stemming {
            Analyzer::standard()
        } else {
            Analyzer::exact()
        }
    }
}

/// One configured driver, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum DriverConfig {
    /// Elasticsearch through a host-provided search client.
    Elastic(ElasticConfig),
    /// In-process backend.
    Memory(MemoryConfig),
    /// No-op backend.
    Null,
}

impl DriverConfig {
    /// Kind name ("elastic", "memory" or "null").
    pub fn kind(&self) -> &'static str {
        match self {
            DriverConfig::Elastic(_) => "elastic",
            DriverConfig::Memory(_) => "memory",
            DriverConfig::Null => "null",
        }
    }
}

/// Driver registry configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Name of the driver used when none is given explicitly.
    pub default_driver: Option<String>,
    /// Drivers by name.
    pub drivers: BTreeMap<String, DriverConfig>,
}

impl SearchConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check internal consistency.
    ///
    /// An unset default driver is accepted here and reported when the
    /// default driver is first needed; a default naming an unknown driver
    /// is rejected immediately.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default_driver
            && !self.drivers.contains_key(name)
        {
            return Err(SearchlightError::driver_not_set(format!(
                "default driver '{name}' is not configured"
            )));
        }

        for (name, driver) in &self.drivers {
            if let DriverConfig::Elastic(elastic) = driver {
                if elastic.host.trim().is_empty() {
                    return Err(SearchlightError::config(format!(
                        "driver '{name}': host must not be empty"
                    )));
                }
                if elastic.port == 0 {
                    return Err(SearchlightError::config(format!(
                        "driver '{name}': port must not be 0"
                    )));
                }
                if elastic.index.trim().is_empty() {
                    return Err(SearchlightError::config(format!(
                        "driver '{name}': index must not be empty"
                    )));
                }
            }
        }
        Ok(())
    }
}
