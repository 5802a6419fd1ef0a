//! Error types for the store and the command layer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access task file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("task file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Task with id {0} not found.")]
    NotFound(u64),
    #[error("no task id left after {0}")]
    IdsExhausted(u64),
}

#[derive(Debug, Error)]
pub enum CmdError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CmdError {
    /// Process exit status for this error: 1 storage, 2 usage, 3 not found.
    pub fn exit_code(&self) -> u8 {
        match self {
            CmdError::Usage(_) => 2,
            CmdError::Store(StoreError::NotFound(_)) => 3,
            CmdError::Store(_) => 1,
        }
    }
}
