//! CLI argument definitions using clap derive
//!
//! Every option is also readable from the environment variable the original
//! bootstrap script honored (CACHE_DIR, DEBUG, NOCACHE, ...), so
//! `NOCACHE=1 srcclr` and `srcclr --no-cache` are equivalent.

use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Default download endpoint root
pub const DEFAULT_BASE_URL: &str = "https://download.sourceclear.com";

/// srcclr - bootstrap launcher for the SourceClear scan agent
///
/// Resolves an agent release, downloads the platform archive into a
/// local cache, unpacks it, and hands control to the agent binary.
#[derive(Parser, Debug)]
#[command(name = "srcclr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache directory for downloaded archives and the unpacked agent
    #[arg(long, env = "CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable launcher debug logging and pass --debug to the agent
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Ignore cached archives and force a fresh download
    #[arg(long, env = "NOCACHE", value_parser = FalseyValueParser::new())]
    pub no_cache: bool,

    /// Download and unpack the agent but do not run it
    #[arg(long, env = "NOSCAN", value_parser = FalseyValueParser::new())]
    pub no_scan: bool,

    /// Directory for the agent to scan (the agent defaults to the current directory)
    #[arg(long, env = "SCAN_DIR")]
    pub scan_dir: Option<PathBuf>,

    /// Pin an exact agent version instead of querying the latest release
    #[arg(long, env = "VERSION")]
    pub agent_version: Option<String>,

    /// Request JSON output from the agent
    #[arg(long, env = "JSON", value_parser = FalseyValueParser::new())]
    pub json: bool,

    /// Request verbose output from the agent
    #[arg(long, env = "VERBOSE", value_parser = FalseyValueParser::new())]
    pub verbose: bool,

    /// Download endpoint root (mirrors and testing)
    #[arg(long, env = "SRCCLR_BASE_URL", hide = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Arguments forwarded verbatim to the agent
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
