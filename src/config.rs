//! Launcher configuration
//!
//! The CLI/environment options are materialized once into an immutable
//! `Config` that is passed by reference into every pipeline stage. Path and
//! URL construction for the cache layout lives here so the stages agree on
//! where archives and the unpacked agent go:
//!
//!   <cache>/srcclr-<version>-<platform>.tgz   downloaded archive
//!   <cache>/srcclr/                           unpacked installation
//!   <cache>/srcclr/VERSION                    installed version marker
//!   <cache>/srcclr/bin/srcclr                 the agent binary

use crate::cli::Cli;
use crate::platform::Platform;
use std::path::PathBuf;

/// Name of the installation directory inside the cache
const INSTALL_DIR: &str = "srcclr";

/// Immutable launcher configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Long-lived directory holding archives and the unpacked agent
    pub cache_dir: PathBuf,
    /// Launcher debug logging; also forwarded to the agent as --debug
    pub debug: bool,
    /// Bypass cached archives and the installed-version short cut
    pub no_cache: bool,
    /// Stop after download/extraction without invoking the agent
    pub no_scan: bool,
    /// Explicit scan target, appended to the agent argv when set
    pub scan_dir: Option<PathBuf>,
    /// Pinned agent version, bypassing the latest-version query
    pub agent_version: Option<String>,
    /// Request JSON output from the agent
    pub json: bool,
    /// Request verbose output from the agent
    pub verbose: bool,
    /// Download endpoint root, without a trailing slash
    pub base_url: String,
    /// Trailing arguments forwarded verbatim to the agent
    pub args: Vec<String>,
}

impl Config {
    /// Build the configuration from parsed CLI arguments
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            cache_dir: cli.cache_dir.unwrap_or_else(std::env::temp_dir),
            debug: cli.debug,
            no_cache: cli.no_cache,
            no_scan: cli.no_scan,
            scan_dir: cli.scan_dir,
            agent_version: cli.agent_version,
            json: cli.json,
            verbose: cli.verbose,
            base_url: cli.base_url.trim_end_matches('/').to_string(),
            args: cli.args,
        }
    }

    /// Archive filename for a version/platform pair
    pub fn archive_name(&self, version: &str, platform: Platform) -> String {
        format!("srcclr-{version}-{platform}.tgz")
    }

    /// Cache path of the downloaded archive
    pub fn archive_path(&self, version: &str, platform: Platform) -> PathBuf {
        self.cache_dir.join(self.archive_name(version, platform))
    }

    /// Download URL of the versioned platform archive
    pub fn archive_url(&self, version: &str, platform: Platform) -> String {
        format!("{}/{}", self.base_url, self.archive_name(version, platform))
    }

    /// URL of the latest-version pointer
    pub fn latest_version_url(&self) -> String {
        format!("{}/LATEST_VERSION", self.base_url)
    }

    /// Root of the unpacked installation
    pub fn install_dir(&self) -> PathBuf {
        self.cache_dir.join(INSTALL_DIR)
    }

    /// Marker file recording the installed version
    pub fn version_marker_path(&self) -> PathBuf {
        self.install_dir().join("VERSION")
    }

    /// The agent binary inside the installation
    pub fn tool_path(&self) -> PathBuf {
        self.install_dir().join("bin").join("srcclr")
    }
}
