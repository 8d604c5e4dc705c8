//! Writing the collected items to disk.
//!
//! The collection is the only copy of a long interactive run, so a failed
//! write to the configured path is retried once under a timestamped name in
//! the backup directory before anything is reported as lost.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use shelfscan_core::Item;

use crate::StoreError;

const DEFAULT_STEM: &str = "items";
const DEFAULT_EXTENSION: &str = "json";

/// Where the collection ended up.
#[derive(Debug)]
pub enum SaveOutcome {
    Primary(PathBuf),
    /// The primary write failed with `primary_error`; the backup at `path`
    /// holds the full collection.
    Backup {
        path: PathBuf,
        primary_error: std::io::Error,
    },
}

impl SaveOutcome {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Primary(path) | SaveOutcome::Backup { path, .. } => path,
        }
    }

    #[must_use]
    pub fn used_backup(&self) -> bool {
        matches!(self, SaveOutcome::Backup { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ResultStore {
    primary: PathBuf,
    backup_dir: PathBuf,
}

impl ResultStore {
    #[must_use]
    pub fn new(primary: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            backup_dir: backup_dir.into(),
        }
    }

    #[must_use]
    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// Backup file for a save attempted at `now`:
    /// `<backup_dir>/<stem>_backup_<unix seconds>.<ext>`, taking stem and
    /// extension from the primary path.
    #[must_use]
    pub fn backup_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stem = self
            .primary
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STEM);
        let extension = self
            .primary
            .extension()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_EXTENSION);
        self.backup_dir
            .join(format!("{stem}_backup_{}.{extension}", now.timestamp()))
    }

    /// Writes `items` as a pretty-printed JSON array to the primary path, or
    /// to a backup file if that fails.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Serialize`] if the items cannot be serialized.
    /// - [`StoreError::BothFailed`] if neither file can be written.
    pub async fn save(&self, items: &[Item]) -> Result<SaveOutcome, StoreError> {
        let json = to_json(items)?;

        let primary_error = match tokio::fs::write(&self.primary, &json).await {
            Ok(()) => {
                tracing::info!(path = %self.primary.display(), items = items.len(), "saved items");
                return Ok(SaveOutcome::Primary(self.primary.clone()));
            }
            Err(e) => e,
        };

        let backup = self.backup_path(Utc::now());
        tracing::warn!(
            path = %self.primary.display(),
            backup = %backup.display(),
            error = %primary_error,
            "could not write output file; trying backup"
        );

        match write_creating_dir(&backup, &json).await {
            Ok(()) => {
                tracing::info!(path = %backup.display(), items = items.len(), "saved items to backup");
                Ok(SaveOutcome::Backup {
                    path: backup,
                    primary_error,
                })
            }
            Err(backup_source) => Err(StoreError::BothFailed {
                primary: self.primary.clone(),
                primary_source: primary_error,
                backup,
                backup_source,
            }),
        }
    }
}

/// JSON array with two-space indentation; non-ASCII text is written as-is.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if serialization fails.
pub fn to_json(items: &[Item]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(items)?)
}

async fn write_creating_dir(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}
