//! stake-select: validator selection against a chain snapshot.

mod config;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use stake_chain::{fetch_staking_balances, SnapshotReader};
use stake_selection::{SelectionService, StaticListMode};
use stake_types::AccountId;
use stake_utils::{init_logging, LogFormat};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "stake-select", about = "Nominated proof-of-stake validator selection")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "STAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "STAKE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "STAKE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Past eras of reward points to sample.
    #[arg(long, env = "STAKE_ERAS")]
    eras: Option<u32>,

    /// Maximum number of validators returned.
    #[arg(long, env = "STAKE_TARGET_COUNT")]
    target_count: Option<usize>,

    /// Commission ceiling in percent.
    #[arg(long, env = "STAKE_MAX_COMMISSION")]
    max_commission: Option<String>,

    /// Validators to leave out (comma-separated).
    #[arg(long, env = "STAKE_EXCLUDE", value_delimiter = ',')]
    exclude: Vec<String>,

    /// URL of a newline-separated validator list.
    #[arg(long, env = "STAKE_STATIC_LIST_URL")]
    static_list_url: Option<String>,

    /// Apply the static list as an allow-list instead of an exclude-list.
    #[arg(long, env = "STAKE_STATIC_LIST_ALLOW")]
    static_list_allow: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Rank validators for a nominator and print them as JSON.
    Select {
        /// Chain snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,

        /// Nominating account; its current nominations are left out.
        #[arg(long)]
        nominator: String,
    },
    /// Print the staking balances of an account as JSON.
    Balances {
        /// Chain snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        account: String,
    },
}

impl Cli {
    /// File config with flag and env overrides applied.
    fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = match &self.config {
            Some(path) => CliConfig::from_toml_file(path)?,
            None => CliConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }

        let selection = &mut config.selection;
        if let Some(eras) = self.eras {
            selection.eras = eras;
        }
        if let Some(count) = self.target_count {
            selection.target_count = count;
        }
        if let Some(raw) = &self.max_commission {
            selection.max_commission_percent = stake_types::parse_balance(raw)
                .with_context(|| format!("invalid --max-commission {raw:?}"))?;
        }
        for raw in &self.exclude {
            selection.excluded_validators.push(AccountId::parse(raw)?);
        }
        if let Some(url) = &self.static_list_url {
            selection.static_list_url = Some(url.clone());
        }
        if self.static_list_allow {
            selection.static_list_mode = StaticListMode::Allow;
        }
        selection.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let level = config.log_level.as_deref().unwrap_or("info");
    init_logging(config.log_format, level)?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Select {
            snapshot,
            nominator,
        } => {
            let nominator = AccountId::parse(&nominator)?;
            let reader = SnapshotReader::from_json_file(&snapshot)?;
            let service = SelectionService::new(reader, config.selection);
            let selected = service.select_validators(&nominator).await?;
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        Command::Balances { snapshot, account } => {
            let account = AccountId::parse(&account)?;
            let reader = SnapshotReader::from_json_file(&snapshot)?;
            let balances = fetch_staking_balances(&reader, &account).await?;
            println!("{}", serde_json::to_string_pretty(&balances)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "stake-select",
            "--eras",
            "3",
            "--max-commission",
            "12.5",
            "--exclude",
            "v1,v2",
            "--static-list-allow",
            "select",
            "--snapshot",
            "s.json",
            "--nominator",
            "me",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.selection.eras, 3);
        assert_eq!(config.selection.max_commission_percent.to_string(), "12.5");
        assert_eq!(
            config.selection.excluded_validators,
            vec![AccountId::new("v1"), AccountId::new("v2")]
        );
        assert_eq!(config.selection.static_list_mode, StaticListMode::Allow);
    }

    #[test]
    fn log_format_parses() {
        let cli = Cli::parse_from([
            "stake-select",
            "--log-format",
            "json",
            "balances",
            "--snapshot",
            "s.json",
            "--account",
            "a",
        ]);
        assert_eq!(cli.resolve_config().unwrap().log_format, LogFormat::Json);
    }

    #[test]
    fn out_of_range_commission_rejected() {
        let cli = Cli::parse_from([
            "stake-select",
            "--max-commission",
            "101",
            "balances",
            "--snapshot",
            "s.json",
            "--account",
            "a",
        ]);
        assert!(cli.resolve_config().is_err());
    }
}
