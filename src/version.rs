//! Agent version resolution
//!
//! Decides which release to run and whether the fetch stage needs to do any
//! work. The zero-network fast path: when caching is enabled and the
//! installed version's archive is still in the cache, neither the
//! latest-version pointer nor the archive endpoint is contacted.
//!
//! A failed latest-version query is recoverable: the launcher logs a warning
//! and degrades to the installed version, or to the `latest` archive alias
//! when nothing is installed.

use crate::config::Config;
use crate::error::{LauncherError, LauncherResult};
use crate::fetch::{http_agent, LATEST_VERSION_TIMEOUT};
use crate::platform::Platform;
use tracing::{debug, warn};

/// Alias the download endpoint serves for the newest release
const LATEST_ALIAS: &str = "latest";

/// Outcome of version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Version string driving the archive name and extraction-skip check
    pub version: String,
    /// Whether the fetch stage should run at all
    pub download: bool,
}

/// Resolve the agent version to run
pub async fn resolve(config: &Config, platform: Platform) -> LauncherResult<Resolved> {
    // A pinned version always goes through the fetcher, which itself
    // short-circuits on a cached archive.
    if let Some(version) = &config.agent_version {
        debug!("agent version pinned to {version}");
        return Ok(Resolved {
            version: version.clone(),
            download: true,
        });
    }

    if !config.no_cache {
        if let Some(installed) = installed_version(config).await {
            if config.archive_path(&installed, platform).is_file() {
                debug!("cache holds {installed}; skipping version query");
                return Ok(Resolved {
                    version: installed,
                    download: false,
                });
            }
        }
    }

    match query_latest(config).await {
        Ok(latest) => {
            let cached = !config.no_cache && config.archive_path(&latest, platform).is_file();
            Ok(Resolved {
                version: latest,
                download: !cached,
            })
        }
        Err(e) => {
            warn!("{e}");
            if !config.no_cache {
                if let Some(installed) = installed_version(config).await {
                    warn!("falling back to installed version {installed}");
                    return Ok(Resolved {
                        version: installed,
                        download: true,
                    });
                }
            }
            warn!("falling back to the \"{LATEST_ALIAS}\" archive");
            Ok(Resolved {
                version: LATEST_ALIAS.to_string(),
                download: true,
            })
        }
    }
}

/// Read the version marker of the installed agent, if any
pub(crate) async fn installed_version(config: &Config) -> Option<String> {
    let marker = config.version_marker_path();
    let contents = tokio::fs::read_to_string(&marker).await.ok()?;
    let version = contents.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Fetch the latest-version pointer with the short timeout
async fn query_latest(config: &Config) -> LauncherResult<String> {
    let url = config.latest_version_url();
    debug!("querying {url}");

    let version = tokio::task::spawn_blocking(move || -> Result<String, ureq::Error> {
        let agent = http_agent(LATEST_VERSION_TIMEOUT);
        let mut response = agent.get(&url).call()?;
        Ok(response.body_mut().read_to_string()?.trim().to_string())
    })
    .await
    .map_err(|e| LauncherError::Internal(format!("version query task failed: {e}")))?
    .map_err(|e| LauncherError::LatestQueryFailed(e.to_string()))?;

    if version.is_empty() {
        return Err(LauncherError::LatestQueryFailed(
            "latest-version pointer was empty".to_string(),
        ));
    }
    Ok(version)
}
