// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::utils::format_amount;

/// Load and validate the config file, logging what a check run would use.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::info!("Validating configuration at {}", config_path.display());

    let config = Config::load(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match config {
        Ok(config) => {
            log::info!("✓ Config OK");
            log::info!("    source: {}", config.source.url);
            log::info!(
                "    threshold: {} {} ({:?})",
                format_amount(config.threshold.amount),
                config.threshold.currency,
                config.threshold.comparison
            );
            log::info!("    dedup: {:?}", config.alert.dedup);
            log::info!("    state file: {}", config.paths.state_file);
            log::info!("    dry run: {}", config.dry_run);
            Ok(config)
        }
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}
