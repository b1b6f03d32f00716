use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;
use serde::Deserialize;

use crate::transcript::LanguagePreference;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub primary_lang: Option<String>,
    pub secondary_lang: Option<String>,
}

impl Config {
    /// Load config from `path` if it exists, defaults otherwise
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn languages(&self) -> LanguagePreference {
        let defaults = LanguagePreference::default();
        LanguagePreference {
            primary: self.primary_lang.clone().unwrap_or(defaults.primary),
            secondary: self.secondary_lang.clone().unwrap_or(defaults.secondary),
        }
    }
}

/// Socket address for a bare IPv4 or IPv6 host
pub fn listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host.parse().wrap_err_with(|| format!("invalid listen host {host}"))?;
    Ok(SocketAddr::new(ip, port))
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}
