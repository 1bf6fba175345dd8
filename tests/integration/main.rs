//! Integration tests for the srcclr launcher

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::path::Path;
use tempfile::TempDir;

/// Environment variables the launcher reads; scrubbed from every test
/// invocation so the test host's environment cannot leak into assertions.
const CONFIG_VARS: &[&str] = &[
    "CACHE_DIR",
    "DEBUG",
    "NOCACHE",
    "NOSCAN",
    "SCAN_DIR",
    "VERSION",
    "JSON",
    "VERBOSE",
    "SRCCLR_BASE_URL",
];

/// Launcher command with the configuration environment scrubbed
fn srcclr() -> Command {
    let mut cmd = cargo_bin_cmd!("srcclr");
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Spawnable launcher process (for tests that signal or poll the child)
/// with the configuration environment scrubbed
#[cfg(unix)]
fn launcher_process() -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_srcclr"));
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Nothing listens on this port; any request fails immediately
const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

/// Platform suffix the launcher will detect on this host
fn host_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if Path::new("/etc/alpine-release").exists() {
        "linux-musl"
    } else {
        "linux-glibc"
    }
}

/// Populate a cache directory with a downloaded archive and an extracted
/// installation whose agent binary echoes its arguments.
#[cfg(unix)]
fn seeded_cache(version: &str) -> TempDir {
    use std::os::unix::fs::PermissionsExt;

    let cache = TempDir::new().unwrap();
    let archive = format!("srcclr-{version}-{}.tgz", host_platform());
    std::fs::write(cache.path().join(archive), b"placeholder").unwrap();

    let install = cache.path().join("srcclr");
    std::fs::create_dir_all(install.join("bin")).unwrap();
    std::fs::write(install.join("VERSION"), format!("{version}\n")).unwrap();

    let tool = install.join("bin").join("srcclr");
    std::fs::write(&tool, "#!/bin/sh\necho \"$@\"\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    cache
}

mod cli_tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn help_displays() {
        srcclr()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("SourceClear scan agent"));
    }

    #[test]
    fn version_displays() {
        srcclr()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("srcclr"));
    }

    #[test]
    fn missing_required_tool_lists_it_on_stderr() {
        srcclr()
            .env("PATH", "")
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "required tool not found on PATH: git",
            ));
    }
}

#[cfg(unix)]
mod launch_tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn cached_agent_runs_default_dirty_scan_without_network() {
        let cache = seeded_cache("3.8.55");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .assert()
            .success()
            .stdout(predicate::str::contains("scan --allow-dirty"));
    }

    #[test]
    fn trailing_args_forwarded_verbatim() {
        let cache = seeded_cache("3.8.55");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .args(["scan", "--url", "https://github.com/x/y"])
            .assert()
            .success()
            .stdout(predicate::str::contains("scan --url https://github.com/x/y"));
    }

    #[test]
    fn flags_compose_around_the_action() {
        let cache = seeded_cache("3.8.55");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .env("DEBUG", "1")
            .env("VERBOSE", "1")
            .env("JSON", "1")
            .env("SCAN_DIR", "/repo")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "--debug scan --allow-dirty --verbose --json /repo",
            ));
    }

    #[test]
    fn pinned_version_reuses_cached_archive() {
        let cache = seeded_cache("3.8.55");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .env("VERSION", "3.8.55")
            .assert()
            .success()
            .stdout(predicate::str::contains("scan --allow-dirty"));
    }

    #[test]
    fn no_scan_succeeds_without_invoking_agent() {
        let cache = seeded_cache("3.8.55");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .env("NOSCAN", "1")
            .assert()
            .success()
            // The echo agent never ran
            .stdout(predicate::str::contains("scan").not());
    }

    #[test]
    fn no_cache_forces_download_despite_seeded_cache() {
        let cache = seeded_cache("9.9.9");
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .env("NOCACHE", "1")
            .env("VERSION", "9.9.9")
            .env("SCAN_DIR", "/repo")
            .assert()
            .failure()
            .stderr(predicate::str::contains(format!(
                "srcclr-9.9.9-{}.tgz",
                host_platform()
            )));
    }

    #[test]
    fn download_failure_names_url_and_reason() {
        let cache = TempDir::new().unwrap();
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .env("VERSION", "1.2.3")
            .assert()
            .failure()
            .stderr(predicate::str::contains("download failed"))
            .stderr(predicate::str::contains(DEAD_ENDPOINT));
    }

    #[test]
    fn interrupt_removes_scratch_directory_and_exits_promptly() {
        use std::net::TcpListener;
        use std::process::Stdio;
        use std::time::{Duration, Instant};

        // Endpoint that accepts the connection and then stays silent,
        // stalling the archive download mid-transfer
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let scratch_parent = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();

        let mut child = launcher_process()
            // Scratch directories land under TMPDIR, so the assertion can
            // scan a directory this test owns
            .env("TMPDIR", scratch_parent.path())
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", &base_url)
            .env("VERSION", "9.9.9")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        // The downloader has connected; the scratch directory exists and
        // the transfer is now blocked waiting on a response
        let (_stream, _) = listener.accept().unwrap();
        assert!(!scratch_dirs(scratch_parent.path()).is_empty());

        let kill = std::process::Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(kill.success());

        // Exit must be prompt despite the stalled download, well inside
        // the 300 s download timeout
        let deadline = Instant::now() + Duration::from_secs(30);
        let status = loop {
            if let Some(status) = child.try_wait().unwrap() {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                panic!("launcher did not exit after SIGINT");
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        assert_eq!(status.code(), Some(130));
        assert!(scratch_dirs(scratch_parent.path()).is_empty());
    }

    /// Scratch directories the launcher left under `dir`
    fn scratch_dirs(dir: &Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                entry
                    .file_name()
                    .to_str()?
                    .starts_with("srcclr-")
                    .then(|| entry.path())
            })
            .collect()
    }

    #[test]
    fn dead_latest_endpoint_degrades_to_latest_alias() {
        let cache = TempDir::new().unwrap();
        srcclr()
            .env("CACHE_DIR", cache.path())
            .env("SRCCLR_BASE_URL", DEAD_ENDPOINT)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "could not determine the latest agent version",
            ))
            .stderr(predicate::str::contains(format!(
                "srcclr-latest-{}.tgz",
                host_platform()
            )));
    }
}
