use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What happens after a background write fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and keep the local state
    Log,
    /// Log the failure and show it in the status bar
    Notify,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Log
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    pub failure_policy: FailurePolicy,
    /// Extra attempts made for a failed write before it is abandoned
    pub retry_attempts: u32,
}

/// User configuration; every field is optional in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
