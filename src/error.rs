use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The database file is missing, unreadable or does not look like a
    /// Launchpad database. Raised before anything is mutated.
    #[error("Launchpad database {} is unavailable: {reason}", path.display())]
    StorageUnavailable { path: PathBuf, reason: String },
    /// The layout document could not be parsed or is structurally invalid.
    #[error("Malformed layout: {0}")]
    MalformedLayout(String),
    #[error("Storage operation failed: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Shell side effect failed: {0}")]
    Shell(String),
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
