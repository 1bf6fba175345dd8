//! Final argument assembly and handoff to the agent
//!
//! Argument order matters to the agent's parser: --debug goes before the
//! action, while --verbose, --json, and the scan target go after it. With no
//! trailing arguments the launcher synthesizes the default action, a scan of
//! the current tree that tolerates uncommitted changes.

use crate::config::Config;
use crate::error::{LauncherError, LauncherResult};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitCode};
use tracing::{debug, info};

/// Default action when the caller passed no arguments
const DEFAULT_ACTION: &[&str] = &["scan", "--allow-dirty"];

/// Invoke the extracted agent, replacing the launcher process.
///
/// With --no-scan the agent is never invoked and the launcher exits 0.
pub fn launch(config: &Config) -> LauncherResult<ExitCode> {
    if config.no_scan {
        info!("skipping agent invocation (--no-scan)");
        return Ok(ExitCode::SUCCESS);
    }

    let tool = config.tool_path();
    if !tool.is_file() {
        return Err(LauncherError::ToolMissing(tool));
    }

    let args = assemble_args(config);
    debug!("exec {} {:?}", tool.display(), args);
    exec_tool(&tool, &args)
}

/// Build the agent argument vector from the configuration
fn assemble_args(config: &Config) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    if config.debug {
        args.push("--debug".into());
    }

    if config.args.is_empty() {
        args.extend(DEFAULT_ACTION.iter().map(OsString::from));
    } else {
        args.extend(config.args.iter().map(OsString::from));
    }

    if config.verbose {
        args.push("--verbose".into());
    }
    if config.json {
        args.push("--json".into());
    }
    if let Some(dir) = &config.scan_dir {
        // Scan paths are not guaranteed to be UTF-8; keep them byte-exact
        args.push(dir.clone().into_os_string());
    }

    args
}

/// Replace the current process image with the agent
#[cfg(unix)]
fn exec_tool(tool: &Path, args: &[OsString]) -> LauncherResult<ExitCode> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure
    let err = Command::new(tool).args(args).exec();
    Err(LauncherError::io(
        format!("executing {}", tool.display()),
        err,
    ))
}

/// Spawn the agent and propagate its exit status
#[cfg(not(unix))]
fn exec_tool(tool: &Path, args: &[OsString]) -> LauncherResult<ExitCode> {
    let status = Command::new(tool)
        .args(args)
        .status()
        .map_err(|e| LauncherError::io(format!("executing {}", tool.display()), e))?;
    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(code.clamp(0, 255) as u8))
}
