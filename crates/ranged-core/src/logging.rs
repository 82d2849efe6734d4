//! Tracing setup for the `ranged` binary.
//!
//! Events go to `$XDG_STATE_HOME/ranged/ranged.log`. When that file cannot be
//! opened the caller falls back to [`init_logging_stderr`]. `RUST_LOG`
//! overrides [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,ranged=debug,ranged_core=debug";

/// Where [`init_logging`] writes.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("ranged").context("xdg base directories")?;
    Ok(dirs.get_state_home().join("ranged.log"))
}

/// Install a global subscriber appending to [`log_file_path`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    install(Mutex::new(file))?;
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Install a stderr subscriber. Keeps any subscriber already installed.
pub fn init_logging_stderr() {
    let _ = install(io::stderr);
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber: {}", e))
}
