use std::path::PathBuf;

use thiserror::Error;

pub mod results;

pub use results::{ResultStore, SaveOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize items: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Neither the output file nor the backup could be written.
    #[error(
        "failed to write {} ({primary_source}) and backup {} ({backup_source})",
        .primary.display(),
        .backup.display()
    )]
    BothFailed {
        primary: PathBuf,
        primary_source: std::io::Error,
        backup: PathBuf,
        #[source]
        backup_source: std::io::Error,
    },
}
