//! Failure taxonomy for a shim run.
//!
//! Every variant is terminal: the binary prints the `Display` form on a single
//! line and exits with status 1.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Invalid package descriptor: {0}")]
    InvalidConfiguration(String),

    #[error("Installation is not supported for this architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("Installation is not supported for this platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Failed to read package descriptor {}: {message}", path.display())]
    ManifestUnreadable { path: PathBuf, message: String },

    #[error("Download failed: {0}")]
    DownloadFailure(#[from] reqwest::Error),

    #[error("No data received from {0}")]
    EmptyDownload(String),

    #[error("Failed to extract '{name}': {message}")]
    ExtractionFailure { name: String, message: String },

    #[error("Failed to run {}: {source}", path.display())]
    SpawnFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShimError {
    /// Status the process exits with when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub(crate) fn extraction(name: &str, message: impl ToString) -> Self {
        ShimError::ExtractionFailure {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
