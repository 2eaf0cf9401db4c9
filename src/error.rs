use std::path::PathBuf;
use std::process::ExitStatus;

use crate::jenkins::Action;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid credential list: {0}")]
    InvalidList(String),

    #[error("invalid credential at index {index}: {reason}")]
    InvalidSpec { index: usize, reason: String },

    #[error("invalid credential '{id}': {reason}")]
    InvalidCredential { id: String, reason: String },

    #[error("failed to read credential list from {}: {source}", .path.display())]
    ReadList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {action} for {target}: {source}")]
    Spawn {
        action: Action,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} failed for {target} ({status}): {stderr}")]
    CommandFailed {
        action: Action,
        target: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{action} for {target} timed out after {secs}s")]
    Timeout {
        action: Action,
        target: String,
        secs: u64,
    },

    #[error("failed to render report: {0}")]
    Serialize(#[from] serde_json::Error),
}
