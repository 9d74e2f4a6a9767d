use std::path::{Path, PathBuf};

use anyhow::Context;
use dcp_deploy::FetchConfig;
use serde::{Deserialize, Serialize};

/// Settings read from the `--config` TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Repository used when a command is given no `--repo`.
    pub repository_root: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            repository_root: PathBuf::from(".dcp/content"),
            fetch: FetchConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// The repository root, preferring an explicit command-line value.
    pub fn repository(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(|| self.repository_root.clone())
    }
}
