//! srcclr - bootstrap launcher for the SourceClear scan agent
//!
//! CLI entry point running the pipeline: preflight, scratch workspace,
//! version resolution, fetch, extraction, agent invocation.

use clap::Parser;
use console::style;
use srcclr::cli::Cli;
use srcclr::config::Config;
use srcclr::error::{LauncherError, LauncherResult};
use srcclr::platform::{self, Platform};
use srcclr::workspace::Workspace;
use srcclr::{extract, fetch, invoke, version};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status for an interrupt, 128 + SIGINT
const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The agent owns stdout (scan results, JSON); launcher logs go to stderr
    let filter = if cli.debug {
        EnvFilter::new("srcclr=debug")
    } else {
        EnvFilter::new("srcclr=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_cli(cli);

    match run(&config).await {
        Ok(code) => code,
        Err(LauncherError::Interrupted) => {
            // Cleanup already ran when the pipeline future was dropped.
            // Returning normally would make the runtime wait out any
            // in-flight blocking download thread (up to the download
            // timeout) and swallow further SIGINTs, so leave immediately.
            std::process::exit(i32::from(INTERRUPTED));
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Race the pipeline against an interrupt. Cancelling the pipeline future
/// drops the scratch workspace, so no temp directory outlives the run.
async fn run(config: &Config) -> LauncherResult<ExitCode> {
    tokio::select! {
        result = pipeline(config) => result,
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupt received, cleaning up");
            Err(LauncherError::Interrupted)
        }
    }
}

async fn pipeline(config: &Config) -> LauncherResult<ExitCode> {
    platform::check_required_tools(platform::REQUIRED_TOOLS)?;
    let platform = Platform::detect()?;

    let workspace = Workspace::create()?;

    let resolved = version::resolve(config, platform).await?;
    info!("agent version: {}", resolved.version);

    if resolved.download {
        fetch::download(config, &workspace, platform, &resolved.version).await?;
    }
    extract::install(config, platform, &resolved.version).await?;

    // The scratch directory must be gone before the process image is replaced
    drop(workspace);

    invoke::launch(config)
}
