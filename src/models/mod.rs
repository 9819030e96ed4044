// src/models/mod.rs

//! Domain models for the jackpot watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod decision;
mod estimate;
pub mod report;
mod state;

// Re-export all public types
pub use config::{
    AlertConfig, Config, FreshnessConfig, PathsConfig, SourceConfig, TelegramConfig,
    ThresholdConfig,
};
pub use decision::{Decision, SuppressReason};
pub use estimate::{AlertRules, Comparison, DedupScope, DrawEstimate, Threshold};
pub use report::{RuntimeReport, Status};
pub use state::AlertState;
