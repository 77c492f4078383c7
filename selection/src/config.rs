//! Selection configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use stake_types::{AccountId, Balance};

use crate::filters::StaticListMode;
use crate::SelectionError;

/// Tunables of a validator selection.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Past eras of reward points to sample, on top of the active era.
    #[serde(default = "default_eras")]
    pub eras: u32,

    /// Maximum number of validators returned.
    #[serde(default = "default_target_count")]
    pub target_count: usize,

    /// Validators with this many backers or more are dropped.
    #[serde(default = "default_max_nominators")]
    pub max_nominators: u32,

    /// Performance rating for validators without reward-point history.
    #[serde(default = "default_performance")]
    pub default_performance: Balance,

    /// Validators charging more than this commission (in percent) are dropped.
    #[serde(default = "default_max_commission_percent")]
    pub max_commission_percent: Balance,

    #[serde(default)]
    pub excluded_validators: Vec<AccountId>,

    /// When non-empty, only these validators are eligible.
    #[serde(default)]
    pub allowed_validators: Vec<AccountId>,

    /// Newline-separated validator list served over HTTP.
    #[serde(default)]
    pub static_list_url: Option<String>,

    #[serde(default)]
    pub static_list_mode: StaticListMode,

    /// Per-query chain read timeout.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_eras() -> u32 {
    7
}

fn default_target_count() -> usize {
    16
}

fn default_max_nominators() -> u32 {
    256
}

fn default_performance() -> Balance {
    Balance::new(25, 2)
}

fn default_max_commission_percent() -> Balance {
    Balance::ONE_HUNDRED
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SelectionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SelectionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SelectionError> {
        let config: Self = toml::from_str(s).map_err(|e| SelectionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, SelectionError> {
        toml::to_string_pretty(self).map_err(|e| SelectionError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.default_performance.is_sign_negative() {
            return Err(SelectionError::Config(format!(
                "default_performance must not be negative, got {}",
                self.default_performance
            )));
        }
        if self.max_commission_percent.is_sign_negative()
            || self.max_commission_percent > Balance::ONE_HUNDRED
        {
            return Err(SelectionError::Config(format!(
                "max_commission_percent must be within 0..=100, got {}",
                self.max_commission_percent
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(SelectionError::Config("fetch_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            eras: default_eras(),
            target_count: default_target_count(),
            max_nominators: default_max_nominators(),
            default_performance: default_performance(),
            max_commission_percent: default_max_commission_percent(),
            excluded_validators: Vec::new(),
            allowed_validators: Vec::new(),
            static_list_url: None,
            static_list_mode: StaticListMode::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}
