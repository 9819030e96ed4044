//! Jackpot watcher CLI
//!
//! Local and scheduled execution entry point. Exits non-zero when a run
//! could not complete: bad config, fetch failure, failed delivery or a
//! marker that could not be written.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use jackpot_watch::{
    error::Result,
    models::{
        Config, PathsConfig,
        report::{CHECK_CONFIG_VALID, RuntimeReport, Status},
    },
    pipeline,
    services::{HttpPageSource, TelegramNotifier},
    storage::LocalStateStore,
};

/// jackpot-watch - Lottery jackpot threshold alerts
#[derive(Parser, Debug)]
#[command(
    name = "jackpot-watch",
    version,
    about = "Alert once per draw when the next jackpot estimate clears a threshold"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check: fetch, decide, notify, persist
    Check {
        /// Log the decision and message without sending or saving state
        #[arg(
            long,
            env = "DRY_RUN",
            value_parser = parse_flag,
            num_args = 0..=1,
            default_value = "false",
            default_missing_value = "true"
        )]
        dry_run: bool,

        /// Dedup marker file (overrides paths.state_file)
        #[arg(long, env = "STATE_PATH")]
        state: Option<PathBuf>,

        /// Runtime report file (overrides paths.report_file)
        #[arg(long, env = "OPS_RUNTIME_PATH")]
        report: Option<PathBuf>,

        /// Freshness threshold in seconds (overrides freshness.max_lag_secs)
        #[arg(long, env = "FRESHNESS_THRESHOLD_SECONDS")]
        max_lag_secs: Option<u64>,
    },

    /// Fetch the page and print the extracted estimate
    Parse,

    /// Validate the config file
    Validate,

    /// Show the stored marker and last runtime report
    Status,
}

/// Accept the usual spellings of a boolean environment flag.
fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

struct CheckOverrides {
    dry_run: bool,
    state: Option<PathBuf>,
    report: Option<PathBuf>,
    max_lag_secs: Option<u64>,
}

/// Load config and apply command-line and environment overrides.
fn load_check_config(config_path: &Path, overrides: &CheckOverrides) -> Result<Config> {
    let mut config = Config::load(config_path)?;
    config.dry_run |= overrides.dry_run;
    if let Some(state) = &overrides.state {
        config.paths.state_file = state.display().to_string();
    }
    if let Some(report) = &overrides.report {
        config.paths.report_file = report.display().to_string();
    }
    if let Some(max_lag_secs) = overrides.max_lag_secs {
        config.freshness.max_lag_secs = max_lag_secs;
    }
    config.validate()?;
    Ok(config)
}

async fn check(config_path: &Path, overrides: CheckOverrides) -> Result<()> {
    let mut report = RuntimeReport::start(Utc::now());
    let mut report_path = overrides
        .report
        .clone()
        .unwrap_or_else(|| PathBuf::from(PathsConfig::default().report_file));

    let result = match load_check_config(config_path, &overrides) {
        Ok(config) => {
            report_path = PathBuf::from(&config.paths.report_file);
            report.set_check(CHECK_CONFIG_VALID, Status::Ok, "Configuration loaded.");
            log::info!(
                "Loaded configuration from {} (dry run: {})",
                config_path.display(),
                config.dry_run
            );
            execute_check(&config, &mut report).await
        }
        Err(e) => {
            report.set_check(CHECK_CONFIG_VALID, Status::Fail, e.to_string());
            Err(e)
        }
    };

    if let Err(e) = &result {
        report.warn(e.to_string());
    }
    report.finish(Utc::now(), result.is_ok());

    if let Err(e) = pipeline::write_report(&report_path, &report).await {
        log::warn!(
            "Failed to write runtime report to {}: {}",
            report_path.display(),
            e
        );
    }

    result
}

async fn execute_check(config: &Config, report: &mut RuntimeReport) -> Result<()> {
    let source = HttpPageSource::new(&config.source)?;
    let notifier = TelegramNotifier::from_env(&config.telegram)?;
    let store = LocalStateStore::new(&config.paths.state_file);

    let outcome = pipeline::run_check(config, &source, &notifier, &store, report).await?;
    log::info!(
        "Check complete: {} (notified: {}, state saved: {})",
        outcome.decision.label(),
        outcome.notified,
        outcome.state_saved
    );
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check {
            dry_run,
            state,
            report,
            max_lag_secs,
        } => {
            let overrides = CheckOverrides {
                dry_run,
                state,
                report,
                max_lag_secs,
            };
            if let Err(e) = check(&cli.config, overrides).await {
                log::error!("Check failed: {}", e);
                return Err(e);
            }
        }

        Command::Parse => {
            let config = Config::load(&cli.config)?;
            config.validate()?;
            let source = HttpPageSource::new(&config.source)?;
            pipeline::run_parse(&source).await?;
        }

        Command::Validate => {
            pipeline::run_validate(&cli.config)?;
            log::info!("All validations passed!");
        }

        Command::Status => {
            let config = Config::load(&cli.config)?;
            log::info!("Config: {}", cli.config.display());
            log::info!("State file: {}", config.paths.state_file);
            pipeline::run_status(&config).await;
        }
    }

    Ok(())
}
