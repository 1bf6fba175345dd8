//! Error types for the srcclr launcher
//!
//! All modules use `LauncherResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for launcher operations
pub type LauncherResult<T> = Result<T, LauncherError>;

/// All errors that can occur in the launcher
#[derive(Error, Debug)]
pub enum LauncherError {
    // Preflight errors
    #[error("required tools not found on PATH: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    #[error("unsupported architecture: {0}. The scan agent requires x86_64.")]
    UnsupportedArch(String),

    #[error("unsupported kernel: {0}. The scan agent supports Linux and macOS.")]
    UnsupportedKernel(String),

    // Network errors
    #[error("could not determine the latest agent version: {0}")]
    LatestQueryFailed(String),

    #[error("download failed: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    // Cache errors
    #[error("expected archive missing from cache: {}", .0.display())]
    ArchiveMissing(PathBuf),

    #[error("failed to unpack {}: {reason}", archive.display())]
    ExtractFailed { archive: PathBuf, reason: String },

    #[error("agent executable not found: {}", .0.display())]
    ToolMissing(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Lifecycle errors
    #[error("interrupted")]
    Interrupted,

    #[error("internal error: {0}")]
    Internal(String),
}

impl LauncherError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingTools(_) => Some("Install the missing tools and re-run"),
            Self::DownloadFailed { .. } => {
                Some("Check network connectivity, then re-run the launcher")
            }
            Self::ArchiveMissing(_) | Self::ToolMissing(_) => {
                Some("The cache may be corrupt; re-run with --no-cache")
            }
            _ => None,
        }
    }
}
