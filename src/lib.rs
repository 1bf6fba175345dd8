//! srcclr - bootstrap launcher for the SourceClear scan agent
//!
//! Verifies host prerequisites, resolves an agent release, downloads the
//! platform archive into a local cache, unpacks it, and hands control to
//! the agent binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod invoke;
pub mod platform;
pub mod version;
pub mod workspace;

pub use error::{LauncherError, LauncherResult};
