//! End-to-end validator selection.

use std::time::Duration;

use stake_chain::ChainStateReader;
use stake_phragmen::elect;
use stake_types::AccountId;

use crate::{
    build_voters, fetch_chain_data, order_validators_by_return, ElectedWithReturn, RankingParams,
    SelectionConfig, SelectionError, StaticListClient, ValidatorFilters,
};

/// Selects nomination targets from live chain state.
///
/// Every call reads fresh state through the reader; nothing is cached.
pub struct SelectionService<R> {
    reader: R,
    config: SelectionConfig,
    fetch_timeout: Duration,
    static_lists: StaticListClient,
}

impl<R: ChainStateReader> SelectionService<R> {
    pub fn new(reader: R, config: SelectionConfig) -> Self {
        let fetch_timeout = config.fetch_timeout();
        Self {
            reader,
            config,
            fetch_timeout,
            static_lists: StaticListClient::new(),
        }
    }

    /// Override the per-query timeout from the config.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Run a full selection on behalf of `exclude`, whose own nominations are
    /// left out of the election.
    pub async fn select_validators(
        &self,
        exclude: &AccountId,
    ) -> Result<Vec<ElectedWithReturn>, SelectionError> {
        let data = fetch_chain_data(&self.reader, self.config.eras, self.fetch_timeout).await?;
        let voters = build_voters(&data, exclude)?;
        let outcome = elect(&voters, data.count as usize);

        let static_list = match &self.config.static_list_url {
            Some(url) => self.static_lists.fetch(url).await,
            None => Vec::new(),
        };
        let filters = ValidatorFilters::from_config(&self.config, static_list);
        let params = RankingParams {
            target_count: self.config.target_count,
            default_performance: self.config.default_performance,
        };
        let ranked = order_validators_by_return(
            &outcome.elected,
            &data.validators,
            &data.performance,
            &filters,
            &params,
        );

        tracing::info!(
            nominator = %exclude,
            active_era = data.active_era,
            voters = voters.len(),
            elected = outcome.elected.len(),
            selected = ranked.len(),
            "validator selection complete"
        );
        Ok(ranked)
    }
}
