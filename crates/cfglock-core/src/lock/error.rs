//! Error types for file locking

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for lock operations
#[derive(Error, Debug)]
pub enum LockError {
    /// The wait ran out and the escalation declined to force (or was absent)
    #[error(
        "LOCK_TIMEOUT: timed out after {:.2}s waiting for lock on {}",
        .waited.as_secs_f64(),
        .resource.display()
    )]
    Timeout {
        /// The protected resource
        resource: PathBuf,
        /// How long acquisition waited before giving up
        waited: Duration,
    },

    /// Any file-system failure other than contention
    #[error("LOCK_IO_ERROR: I/O error during {operation} on {}: {source}", .path.display())]
    Io {
        /// The underlying I/O error
        source: std::io::Error,
        /// Path to the lock marker
        path: PathBuf,
        /// Operation that failed
        operation: String,
    },
}

impl LockError {
    pub(crate) fn io(source: std::io::Error, path: &Path, operation: &str) -> Self {
        LockError::Io {
            source,
            path: path.to_path_buf(),
            operation: operation.to_string(),
        }
    }
}
