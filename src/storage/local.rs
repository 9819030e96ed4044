//! Local filesystem storage implementation.
//!
//! The marker is a small JSON document. Writes go to a sibling temp file
//! which is then renamed over the target, so readers only ever see a
//! complete old or complete new document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::AlertState;
use crate::storage::AlertStateStore;

/// JSON file backend for the dedup marker.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store for the marker at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file next to the target; same directory keeps the rename atomic.
    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl AlertStateStore for LocalStateStore {
    async fn load(&self) -> Option<AlertState> {
        let bytes = match self.read_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("No dedup marker at {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!(
                    "Dedup marker at {} unreadable, treating as empty: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_slice::<AlertState>(&bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!(
                    "Dedup marker at {} is corrupt, treating as empty: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, state: &AlertState) -> Result<()> {
        let path = self.path.display().to_string();
        let bytes = serde_json::to_vec_pretty(state).map_err(|e| AppError::state_io(&path, e))?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::state_io(&path, e))?;
        log::info!(
            "Dedup marker saved to {} ({})",
            path,
            state.last_alerted_draw_key
        );
        Ok(())
    }
}
