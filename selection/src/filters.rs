//! Eligibility filters applied to ranked validators.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use stake_chain::ValidatorPrefs;
use stake_types::{AccountId, Balance};

use crate::{ElectedWithReturn, SelectionConfig, SelectionError};

/// How a fetched static list is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticListMode {
    /// Listed validators are dropped.
    #[default]
    Exclude,
    /// Only listed validators are kept.
    Allow,
}

/// Why a validator was filtered out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Blocked,
    Saturated,
    Commission,
    Excluded,
    NotAllowed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Blocked => "blocks nominations",
            Self::Saturated => "too many backers",
            Self::Commission => "commission above ceiling",
            Self::Excluded => "excluded",
            Self::NotAllowed => "not in allowed list",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Debug)]
pub struct ValidatorFilters {
    max_nominators: u32,
    max_commission_percent: Balance,
    excluded: HashSet<AccountId>,
    /// Empty means every validator is allowed.
    allowed: HashSet<AccountId>,
}

impl ValidatorFilters {
    /// Only the blocked and saturation checks.
    pub fn new(max_nominators: u32) -> Self {
        Self {
            max_nominators,
            max_commission_percent: Balance::ONE_HUNDRED,
            excluded: HashSet::new(),
            allowed: HashSet::new(),
        }
    }

    /// Filters from `config`, with an already fetched static list.
    pub fn from_config(config: &SelectionConfig, static_list: Vec<AccountId>) -> Self {
        let filters = Self::new(config.max_nominators)
            .with_max_commission_percent(config.max_commission_percent)
            .with_excluded(config.excluded_validators.iter().cloned())
            .with_allowed(config.allowed_validators.iter().cloned());
        match config.static_list_mode {
            StaticListMode::Exclude => filters.with_excluded(static_list),
            StaticListMode::Allow => filters.with_allowed(static_list),
        }
    }

    pub fn with_max_commission_percent(mut self, percent: Balance) -> Self {
        self.max_commission_percent = percent;
        self
    }

    pub fn with_excluded(mut self, ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    pub fn with_allowed(mut self, ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.allowed.extend(ids);
        self
    }

    pub fn check(
        &self,
        validator: &ElectedWithReturn,
        prefs: &ValidatorPrefs,
    ) -> Result<(), Rejection> {
        if validator.blocked {
            return Err(Rejection::Blocked);
        }
        if validator.backers >= self.max_nominators {
            return Err(Rejection::Saturated);
        }
        if prefs.commission.to_percent() > self.max_commission_percent {
            return Err(Rejection::Commission);
        }
        if self.excluded.contains(&validator.validator_id) {
            return Err(Rejection::Excluded);
        }
        if !self.allowed.is_empty() && !self.allowed.contains(&validator.validator_id) {
            return Err(Rejection::NotAllowed);
        }
        Ok(())
    }

    pub fn admits(&self, validator: &ElectedWithReturn, prefs: &ValidatorPrefs) -> bool {
        self.check(validator, prefs).is_ok()
    }
}

/// Split a static list body into validator ids, one per non-blank line.
pub fn parse_static_list(body: &str) -> Vec<AccountId> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(AccountId::from)
        .collect()
}

/// Default timeout for static list requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches newline-separated validator lists over HTTP.
pub struct StaticListClient {
    http_client: reqwest::Client,
}

impl StaticListClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http_client }
    }

    /// `GET url` and parse the body.
    pub async fn try_fetch(&self, url: &str) -> Result<Vec<AccountId>, SelectionError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SelectionError::StaticList(format!("request timed out: {e}"))
            } else if e.is_connect() {
                SelectionError::StaticList(format!("connection failed: {e}"))
            } else {
                SelectionError::StaticList(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SelectionError::StaticList(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SelectionError::StaticList(format!("failed to read body: {e}")))?;
        Ok(parse_static_list(&body))
    }

    /// Like [`try_fetch`](Self::try_fetch), but a failure yields an empty list.
    pub async fn fetch(&self, url: &str) -> Vec<AccountId> {
        match self.try_fetch(url).await {
            Ok(list) => {
                tracing::debug!(url, entries = list.len(), "static list fetched");
                list
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "ignoring static list");
                Vec::new()
            }
        }
    }
}

impl Default for StaticListClient {
    fn default() -> Self {
        Self::new()
    }
}
