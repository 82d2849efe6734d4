use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::blocks::DEFAULT_BLOCK_SIZE;
use crate::http::HttpOptions;
use crate::reader::ReaderOptions;

/// Configuration loaded from `~/.config/ranged/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedConfig {
    /// Cache block size in bytes; every fetch is a multiple of this.
    pub block_size: u64,
    /// Seconds to wait for a TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Hard limit in seconds on a single HEAD or GET.
    pub request_timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
    /// Optional User-Agent header; libcurl sends none by default.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            connect_timeout_secs: 15,
            request_timeout_secs: 300,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

impl RangedConfig {
    /// Reader options for this configuration. Rejects a zero block size.
    pub fn reader_options(&self) -> Result<ReaderOptions> {
        let block_size =
            NonZeroU64::new(self.block_size).context("block_size must be greater than zero")?;
        Ok(ReaderOptions {
            block_size,
            http: HttpOptions {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_redirections: self.max_redirections,
                user_agent: self.user_agent.clone(),
            },
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ranged")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RangedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RangedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RangedConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: RangedConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
