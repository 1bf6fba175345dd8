//! Archive download into the cache
//!
//! Downloads stream into the scratch directory first and move into the cache
//! only once complete, so an interrupted transfer never leaves a truncated
//! archive behind. A download failure is always fatal; there is no retry
//! loop, the user re-runs the launcher.

use crate::config::Config;
use crate::error::{LauncherError, LauncherResult};
use crate::platform::Platform;
use crate::workspace::Workspace;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for the latest-version pointer fetch
pub const LATEST_VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the archive download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Build a blocking HTTP agent with a global timeout
pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Download the versioned platform archive into the cache.
///
/// Short-circuits on a cached archive unless caching is bypassed; a pinned
/// version therefore re-checks the cache here rather than in the resolver.
pub async fn download(
    config: &Config,
    workspace: &Workspace,
    platform: Platform,
    version: &str,
) -> LauncherResult<PathBuf> {
    let dest = config.archive_path(version, platform);
    if !config.no_cache && dest.is_file() {
        debug!("reusing cached archive {}", dest.display());
        return Ok(dest);
    }

    let url = config.archive_url(version, platform);
    let staging = workspace.path().join(config.archive_name(version, platform));
    info!("downloading {url}");

    let spinner = create_spinner(format!("Downloading srcclr {version}..."));
    let fetch_url = url.clone();
    let fetch_dest = staging.clone();
    let result = tokio::task::spawn_blocking(move || fetch_to_file(&fetch_url, &fetch_dest))
        .await
        .map_err(|e| LauncherError::Internal(format!("download task failed: {e}")));
    spinner.finish_and_clear();
    result??;

    // Move the completed transfer into the cache
    tokio::fs::create_dir_all(&config.cache_dir)
        .await
        .map_err(|e| {
            LauncherError::io(
                format!("creating cache directory {}", config.cache_dir.display()),
                e,
            )
        })?;
    move_into_cache(&staging, &dest).await?;

    info!("cached {}", dest.display());
    Ok(dest)
}

/// Blocking GET streaming the response body into a file
fn fetch_to_file(url: &str, dest: &Path) -> LauncherResult<()> {
    let agent = http_agent(DOWNLOAD_TIMEOUT);
    let response = agent.get(url).call().map_err(|e| {
        LauncherError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })?;

    let mut reader = response.into_body().into_reader();
    let mut file = std::fs::File::create(dest)
        .map_err(|e| LauncherError::io(format!("creating {}", dest.display()), e))?;
    std::io::copy(&mut reader, &mut file).map_err(|e| LauncherError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Rename the staged file into the cache, falling back to copy+remove when
/// scratch and cache live on different filesystems.
async fn move_into_cache(staging: &Path, dest: &Path) -> LauncherResult<()> {
    if tokio::fs::rename(staging, dest).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(staging, dest).await.map_err(|e| {
        LauncherError::io(
            format!("moving archive into cache at {}", dest.display()),
            e,
        )
    })?;
    let _ = tokio::fs::remove_file(staging).await;
    Ok(())
}

fn create_spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
