//! Storage abstractions for the dedup marker.
//!
//! The marker is a single-row key-value record naming the last draw an
//! alert was delivered for. It is read once per run and written at most
//! once per run, only after delivery succeeded.
//!
//! ## File Layout
//!
//! ```text
//! .state/
//! ├── last_alert.json       # Dedup marker
//! └── runtime_report.json   # Last run summary (see pipeline::report)
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::AlertState;

// Re-export for convenience
pub use local::LocalStateStore;

/// Trait for dedup marker backends.
#[async_trait]
pub trait AlertStateStore: Send + Sync {
    /// Read the marker.
    ///
    /// A missing, unreadable or corrupt marker reads as `None`: losing the
    /// marker means a possible repeat alert, never a missed one.
    async fn load(&self) -> Option<AlertState>;

    /// Replace the marker.
    ///
    /// A crash part-way through leaves either the old or the new marker.
    async fn save(&self, state: &AlertState) -> Result<()>;
}
