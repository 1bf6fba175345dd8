//! Archive extraction into the stable install location
//!
//! The install directory holds exactly one unpacked agent at a time. A stale
//! installation is never partially reused: unless the version marker matches
//! the resolved version exactly, the whole directory is removed and rebuilt
//! from the archive.

use crate::config::Config;
use crate::error::{LauncherError, LauncherResult};
use crate::platform::Platform;
use crate::version::installed_version;
use flate2::read::GzDecoder;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};

/// Ensure the install directory holds the resolved version
pub async fn install(config: &Config, platform: Platform, version: &str) -> LauncherResult<()> {
    let install_dir = config.install_dir();

    if !config.no_cache && install_dir.is_dir() {
        if let Some(installed) = installed_version(config).await {
            if installed == version {
                debug!("installed agent already at {version}");
                return Ok(());
            }
        }
    }

    let archive = config.archive_path(version, platform);
    if !archive.is_file() {
        // The fetch stage was supposed to leave this behind
        return Err(LauncherError::ArchiveMissing(archive));
    }

    if install_dir.exists() {
        tokio::fs::remove_dir_all(&install_dir).await.map_err(|e| {
            LauncherError::io(
                format!("removing old installation {}", install_dir.display()),
                e,
            )
        })?;
    }
    tokio::fs::create_dir_all(&install_dir).await.map_err(|e| {
        LauncherError::io(
            format!("creating install directory {}", install_dir.display()),
            e,
        )
    })?;

    info!("unpacking {}", archive.display());
    let unpack_archive = archive.clone();
    let unpack_dest = install_dir.clone();
    tokio::task::spawn_blocking(move || unpack_stripped(&unpack_archive, &unpack_dest))
        .await
        .map_err(|e| LauncherError::Internal(format!("unpack task failed: {e}")))??;

    Ok(())
}

/// Unpack a gzip tar archive, stripping the single top-level directory
fn unpack_stripped(archive_path: &Path, dest: &Path) -> LauncherResult<()> {
    let extract_failed = |reason: String| LauncherError::ExtractFailed {
        archive: archive_path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::open(archive_path).map_err(|e| extract_failed(e.to_string()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries().map_err(|e| extract_failed(e.to_string()))? {
        let mut entry = entry.map_err(|e| extract_failed(e.to_string()))?;
        let path = entry
            .path()
            .map_err(|e| extract_failed(e.to_string()))?
            .into_owned();

        // Drop the outer srcclr-<version>-<platform>/ directory
        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(stripped);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| extract_failed(e.to_string()))?;
        }
        entry
            .unpack(&target)
            .map_err(|e| extract_failed(e.to_string()))?;
    }
    Ok(())
}
