//! CLI configuration file: selection settings plus logging.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use stake_selection::SelectionConfig;
use stake_utils::LogFormat;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. "info" or "debug,stake_phragmen=trace".
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(flatten)]
    pub selection: SelectionConfig,
}

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.selection.validate()?;
        Ok(config)
    }
}
