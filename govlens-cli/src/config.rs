//! govlens configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovlensConfig {
    #[serde(default)]
    pub governance: GovernanceConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Governance interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Base URL of the governance interface
    #[serde(default = "default_governance_url")]
    pub url: String,

    /// Proposals per page on the "all proposals" feed
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout; unset waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            url: default_governance_url(),
            page_size: default_page_size(),
            timeout_secs: None,
        }
    }
}

/// User-preference service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: None,
        }
    }
}

/// Identity issued by the external provider. Empty means signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub principal: Option<String>,

    /// Bearer token for the user backend
    #[serde(default)]
    pub token: Option<String>,
}

// Defaults
fn default_governance_url() -> String { "http://localhost:8000/governance".to_string() }
fn default_backend_url() -> String { "http://localhost:8000".to_string() }
fn default_page_size() -> u32 { 50 }

impl GovlensConfig {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}
