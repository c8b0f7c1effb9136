// Zone, query context and SRU endpoint configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_API_VERSION: &str = "1.2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No SRU path configured for zone {0}")]
    UnknownZone(Zone),

    #[error("Invalid zone: {0}")]
    InvalidZone(String),
}

// Deployment scope of a catalog search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Zone {
    #[serde(rename = "IZ")]
    Institution,
    #[serde(rename = "NZ")]
    Network,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Institution => "IZ",
            Zone::Network => "NZ",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IZ" => Ok(Zone::Institution),
            "NZ" => Ok(Zone::Network),
            other => Err(ConfigError::InvalidZone(other.to_string())),
        }
    }
}

// Per-request context: which zone was searched and which institution the
// network-zone electronic holdings are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    pub zone: Zone,
    pub institution_code: String,
}

impl QueryContext {
    pub fn new(zone: Zone, institution_code: impl Into<String>) -> Self {
        Self {
            zone,
            institution_code: institution_code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SruConfig {
    pub sru_paths: HashMap<Zone, String>,
    pub inst_code: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl SruConfig {
    pub fn new(sru_paths: HashMap<Zone, String>, inst_code: impl Into<String>) -> Self {
        Self {
            sru_paths,
            inst_code: inst_code.into(),
            api_version: default_api_version(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn base_url(&self, zone: Zone) -> Result<&str, ConfigError> {
        self.sru_paths
            .get(&zone)
            .map(String::as_str)
            .ok_or(ConfigError::UnknownZone(zone))
    }

    // Context for a search in `zone`, scoped to the configured institution
    pub fn context(&self, zone: Zone) -> QueryContext {
        QueryContext::new(zone, self.inst_code.clone())
    }
}
