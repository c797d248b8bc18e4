//! Error types for lockstep-sync.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from scan, merge, and cycle operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote clipboard transport or envelope failure.
    #[error("remote store error: {0}")]
    Remote(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
