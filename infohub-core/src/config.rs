use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Addresses of the three third-party APIs, overridable so deployments and
/// tests can point the sources elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub rates_url: String,
    pub quotes_url: String,

    /// Seconds before an in-flight upstream call is abandoned.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com".to_owned(),
            forecast_url: "https://api.open-meteo.com".to_owned(),
            rates_url: "https://api.exchangerate-api.com".to_owned(),
            quotes_url: "https://api.quotable.io".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// Top-level configuration stored on disk. Every field has a default, so a
/// missing file is a complete configuration.
///
/// Example TOML:
/// ```toml
/// listen_addr = "0.0.0.0:3001"
///
/// [upstream]
/// rates_url = "https://api.exchangerate-api.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the backend listens on. `INFOHUB_ADDR` overrides it.
    pub listen_addr: String,

    /// Backend URL the terminal client talks to.
    pub backend_url: String,

    /// Seconds before a request to the backend itself is abandoned.
    pub request_timeout_secs: u64,

    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3001".to_owned(),
            backend_url: "http://127.0.0.1:3001".to_owned(),
            request_timeout_secs: 30,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(addr) = std::env::var("INFOHUB_ADDR") {
            cfg.listen_addr = addr;
        }

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "infohub", "infohub")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
