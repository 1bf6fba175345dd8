//! Per-run scratch directory with guaranteed cleanup
//!
//! Downloads are staged here before moving into the cache. The directory is
//! uniquely named so concurrent invocations never collide, and it is removed
//! on every exit path: normal return, error propagation, and interrupt (the
//! cancelled pipeline future drops the `Workspace`).

use crate::error::{LauncherError, LauncherResult};
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

/// Exclusively-owned scratch directory, removed on drop
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh scratch directory under the system temp path
    pub fn create() -> LauncherResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("srcclr-")
            .tempdir()
            .map_err(|e| LauncherError::io("creating scratch directory", e))?;
        debug!("scratch directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the scratch directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
