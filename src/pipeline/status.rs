// src/pipeline/status.rs

//! Show the stored marker and the last runtime report.

use std::path::Path;

use crate::models::report::RuntimeReport;
use crate::models::{AlertState, Config};
use crate::storage::{AlertStateStore, LocalStateStore};

/// What is on disk from previous runs.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub marker: Option<AlertState>,
    pub last_report: Option<RuntimeReport>,
}

/// Read and log the marker and last report. Missing files are not errors.
pub async fn run_status(config: &Config) -> StatusSnapshot {
    let store = LocalStateStore::new(&config.paths.state_file);
    let marker = store.load().await;
    match &marker {
        Some(state) => {
            log::info!("Last alerted draw: {}", state.last_alerted_draw_key);
            if let Some(at) = state.alerted_at {
                log::info!("Alerted at: {}", at.to_rfc3339());
            }
        }
        None => log::info!("No alert has been recorded yet."),
    }

    let last_report = read_report(Path::new(&config.paths.report_file)).await;
    match &last_report {
        Some(report) => {
            log::info!(
                "Last run: {} ({:?}, decision {})",
                report.run_started_at.to_rfc3339(),
                report.status,
                report.decision.as_deref().unwrap_or("none")
            );
            for warning in &report.warnings {
                log::info!("    warning: {warning}");
            }
        }
        None => log::info!("No runtime report found."),
    }

    StatusSnapshot {
        marker,
        last_report,
    }
}

async fn read_report(path: &Path) -> Option<RuntimeReport> {
    let content = tokio::fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&content) {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("Runtime report at {} is unreadable: {}", path.display(), e);
            None
        }
    }
}
