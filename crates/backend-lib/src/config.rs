// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Authentication settings
    pub auth: AuthSettings,
}

/// Token and cookie settings for the authentication core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Access token TTL in seconds
    pub access_ttl_secs: i64,
    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: i64,
    /// Path the auth cookies are scoped to
    pub cookie_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            auth: AuthSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: "ledgerly-dev-secret".to_string(),
            access_ttl_secs: 60 * 60,                // 1 hour
            refresh_ttl_secs: 60 * 60 * 24 * 7,      // 7 days
            cookie_path: "/api".to_string(),
        }
    }
}

impl AuthSettings {
    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.refresh_ttl_secs)
    }
}

impl Settings {
    /// Load settings from `config.toml` and `LEDGERLY_*` environment
    /// variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit config file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("LEDGERLY_").split("__"))
            .extract()?;
        Ok(settings)
    }
}
