use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppSettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings path unavailable")]
    MissingSettingsPath,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidOverride { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, AppSettingsError>;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_FILE_ENV: &str = "PORTFOLIO_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Root of the photo volume that is scanned and served under `/data`.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    /// Prebuilt frontend bundle served for every non-API path.
    pub static_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub site_name: String,
    pub request_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/data"),
            database_path: PathBuf::from("database/app.db"),
            static_dir: PathBuf::from("static"),
            host: "0.0.0.0".to_string(),
            port: 5000,
            site_name: "Fifth Element Photography".to_string(),
            request_timeout_secs: 300,
        }
    }
}

impl AppSettings {
    /// Load from `$PORTFOLIO_SETTINGS` or the platform config file, then apply
    /// environment overrides. A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(SETTINGS_FILE_ENV) {
            Some(explicit) => PathBuf::from(explicit),
            None => settings_file_path()?,
        };
        let mut settings = Self::load_from(&path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: AppSettings = serde_json::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(AppSettings::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(self)?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// | Key                    | Field                  |
    /// |------------------------|------------------------|
    /// | `PORTFOLIO_DATA_DIR`   | `data_dir`             |
    /// | `PORTFOLIO_DATABASE`   | `database_path`        |
    /// | `PORTFOLIO_STATIC_DIR` | `static_dir`           |
    /// | `PORTFOLIO_SITE_NAME`  | `site_name`            |
    /// | `HOST`                 | `host`                 |
    /// | `PORT`                 | `port`                 |
    /// | `REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PORTFOLIO_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("PORTFOLIO_DATABASE") {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = get("PORTFOLIO_STATIC_DIR") {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("PORTFOLIO_SITE_NAME") {
            self.site_name = v;
        }
        if let Some(v) = get("HOST") {
            self.host = v;
        }
        if let Some(v) = get("PORT") {
            self.port = v
                .trim()
                .parse()
                .map_err(|_| AppSettingsError::InvalidOverride { key: "PORT", value: v })?;
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs =
                v.trim()
                    .parse()
                    .map_err(|_| AppSettingsError::InvalidOverride {
                        key: "REQUEST_TIMEOUT_SECS",
                        value: v,
                    })?;
        }
        Ok(())
    }
}

fn settings_file_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().ok_or(AppSettingsError::MissingSettingsPath)?;
    let mut path = base.config_dir().to_path_buf();
    path.push("portfolio");
    path.push("settings.json");
    Ok(path)
}
