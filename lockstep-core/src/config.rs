//! Operator configuration.
//!
//! Loaded from a YAML file (default `config.yaml` in the working directory).
//! Field names on the wire are camelCase to stay compatible with existing
//! deployments:
//!
//! ```yaml
//! username: alice
//! serverAddress: team-clipboard-1
//! filesToTrack:
//!   - main.rs
//!   - lib.rs
//! seconds: 10
//! ```
//!
//! Malformed or missing configuration is fatal at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Base URL of the shared clipboard service when `serverUrl` is not set.
pub const DEFAULT_SERVER_URL: &str = "https://tools.whatfa.com";

/// Participant configuration for one lockstep agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identity announced alongside local edits.
    pub username: String,

    /// Opaque identifier of the shared clipboard record.
    #[serde(rename = "serverAddress")]
    pub server_address: String,

    /// Base URL of the clipboard service.
    #[serde(rename = "serverUrl", default = "default_server_url")]
    pub server_url: String,

    /// Base names of the files to track (exact match, not globs).
    #[serde(rename = "filesToTrack")]
    pub files_to_track: Vec<String>,

    /// Local-edit recency threshold in seconds.
    pub seconds: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Config, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.username.trim().is_empty() {
            return Err(CoreError::InvalidConfig("username must not be empty".into()));
        }
        if self.server_address.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "serverAddress must not be empty".into(),
            ));
        }
        if self.files_to_track.is_empty() {
            return Err(CoreError::InvalidConfig(
                "filesToTrack must list at least one file".into(),
            ));
        }
        if self.seconds == 0 {
            return Err(CoreError::InvalidConfig(
                "seconds (edit threshold) must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
