use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which transport strategy an adapter is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Injected HTTP client (reqwest).
    #[default]
    Client,
    /// libcurl easy handles driven directly.
    Stream,
}

/// TLS verification for https origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Verify the peer certificate chain.
    pub verify_peer: bool,
    /// Verify that the certificate matches the host name.
    pub verify_host: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_peer: true,
            verify_host: true,
        }
    }
}

/// Adapter configuration, usually loaded from `~/.config/httpfs/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFsConfig {
    /// Origin every path is resolved against.
    pub base_url: String,
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Total per-request timeout; none by default so long reads are not cut off.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub tls: TlsConfig,
    /// Extra request headers sent with every probe and fetch.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    15
}

impl HttpFsConfig {
    /// Defaults for everything but the origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: TransportKind::default(),
            follow_redirects: default_follow_redirects(),
            max_redirections: default_max_redirections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: None,
            tls: TlsConfig::default(),
            headers: BTreeMap::new(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpfs")?;
    Ok(xdg_dirs.get_config_home().join("httpfs").join("config.toml"))
}

/// Load configuration from the XDG config directory.
pub fn load() -> Result<HttpFsConfig> {
    let path = config_path()?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<HttpFsConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let cfg: HttpFsConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config at {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
