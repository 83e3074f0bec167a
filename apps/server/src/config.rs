use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use app_settings::{AppSettings, AppSettingsError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    Settings(#[from] AppSettingsError),
    #[error("Invalid HOST address: {0:?}")]
    InvalidHost(String),
}

/// Runtime configuration of the HTTP server, resolved from [`AppSettings`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Photo volume: scanned by the import and served under `/data`.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub static_dir: PathBuf,
    pub site_name: String,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load settings from disk and the environment.
    pub fn load() -> Result<Self> {
        Self::from_settings(AppSettings::load()?)
    }

    pub fn from_settings(settings: AppSettings) -> Result<Self> {
        let ip: IpAddr = settings
            .host
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidHost(settings.host.clone()))?;
        Ok(Self {
            addr: SocketAddr::new(ip, settings.port),
            data_dir: settings.data_dir,
            database_path: settings.database_path,
            static_dir: settings.static_dir,
            site_name: settings.site_name,
            request_timeout_secs: settings.request_timeout_secs,
        })
    }

    /// Entry page of the frontend bundle, served for unknown paths.
    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}
