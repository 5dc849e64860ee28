//! Agent configuration. The namespace prefix is the host's routing prefix, not part of the stat catalog.

use crate::namespace::Namespace;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Routing prefix for every exposed metric
    pub namespace: NamespaceConfig,
    /// Enumeration and polling
    pub collection: CollectionConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub vendor: String,
    pub group: String,
    pub subgroup: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Poll interval (seconds); 0 runs a single cycle
    pub interval_secs: u64,
    /// Return per-metric errors instead of failing the whole batch
    pub partial_results: bool,
    /// procfs mount point holding `net/tcp` and friends
    pub proc_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            vendor: "staples".to_string(),
            group: "procfs".to_string(),
            subgroup: "netstat".to_string(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            partial_results: false,
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl NamespaceConfig {
    pub fn prefix(&self) -> Namespace {
        Namespace::new([self.vendor.as_str(), self.group.as_str(), self.subgroup.as_str()])
    }
}

impl AgentConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AgentConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
