//! Preflight checks: required tools and platform classification
//!
//! The agent archives are published per platform identifier (kernel plus
//! C-library variant). Only x86_64 Linux and macOS are supported; Apple
//! Silicon hosts run the x86_64 agent under Rosetta.

use crate::error::{LauncherError, LauncherResult};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, warn};

/// External executables the scan agent relies on at runtime
pub const REQUIRED_TOOLS: &[&str] = &["git"];

/// Alpine ships musl; its release marker selects the musl archive
const ALPINE_RELEASE: &str = "/etc/alpine-release";

/// Platform identifier used to select the agent archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// x86_64 Linux against glibc
    LinuxGlibc,
    /// x86_64 Linux against musl (Alpine)
    LinuxMusl,
    /// macOS, Intel or Apple Silicon under Rosetta
    MacOs,
}

impl Platform {
    /// Detect the host platform
    pub fn detect() -> LauncherResult<Self> {
        let platform = classify(
            std::env::consts::OS,
            std::env::consts::ARCH,
            Path::new(ALPINE_RELEASE).exists(),
        )?;
        debug!("detected platform: {platform}");
        Ok(platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LinuxGlibc => "linux-glibc",
            Self::LinuxMusl => "linux-musl",
            Self::MacOs => "macos",
        };
        write!(f, "{}", name)
    }
}

/// Map kernel/architecture to a platform identifier.
///
/// Non-x86_64 on Darwin degrades to a warning: Rosetta runs the x86_64
/// agent fine. Everywhere else the mismatch is fatal.
fn classify(os: &str, arch: &str, musl: bool) -> LauncherResult<Platform> {
    match (os, arch) {
        ("linux", "x86_64") if musl => Ok(Platform::LinuxMusl),
        ("linux", "x86_64") => Ok(Platform::LinuxGlibc),
        ("macos", "x86_64") => Ok(Platform::MacOs),
        ("macos", arch) => {
            warn!("unsupported architecture {arch} on macOS; using the x86_64 agent under Rosetta");
            Ok(Platform::MacOs)
        }
        ("linux", arch) => Err(LauncherError::UnsupportedArch(arch.to_string())),
        (os, _) => Err(LauncherError::UnsupportedKernel(os.to_string())),
    }
}

/// Verify that every required tool is on the search path.
///
/// Checks the whole list before failing so the user sees every missing
/// dependency, one error line each, not just the first.
pub fn check_required_tools(tools: &[&str]) -> LauncherResult<()> {
    let mut missing = Vec::new();
    for tool in tools {
        match which::which(tool) {
            Ok(path) => debug!("found {tool} at {}", path.display()),
            Err(_) => {
                error!("required tool not found on PATH: {tool}");
                missing.push((*tool).to_string());
            }
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LauncherError::MissingTools(missing))
    }
}
