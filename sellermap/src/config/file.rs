//! INI file loading and saving.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::geo::{
    Viewport, DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE, DEFAULT_LATITUDE_DELTA,
    DEFAULT_LONGITUDE_DELTA,
};
use crate::location::{FixOptions, DEFAULT_FIX_MAX_AGE, DEFAULT_FIX_TIMEOUT};
use crate::orchestrator::DEFAULT_DEBOUNCE_WINDOW;

use super::keys::ConfigKey;

/// Directory under the home directory holding config and logs.
pub const CONFIG_DIR_NAME: &str = ".sellermap";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log file name inside the config directory.
const LOG_FILE_NAME: &str = "sellermap.log";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] ini::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub debounce_ms: u64,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_WINDOW.as_millis() as u64,
            default_latitude: DEFAULT_CENTER_LATITUDE,
            default_longitude: DEFAULT_CENTER_LONGITUDE,
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            longitude_delta: DEFAULT_LONGITUDE_DELTA,
        }
    }
}

/// `[location]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub timeout_secs: u64,
    pub max_age_ms: u64,
    pub high_accuracy: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FIX_TIMEOUT.as_secs(),
            max_age_ms: DEFAULT_FIX_MAX_AGE.as_millis() as u64,
            high_accuracy: true,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        let file = config_directory()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));
        Self { file }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub map: MapSettings,
    pub location: LocationSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path().ok_or(ConfigFileError::NoHomeDir)?;
        Self::load_from(&path)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path().ok_or(ConfigFileError::NoHomeDir)?;
        self.save_to(&path)
    }

    /// Save to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path)?;
        Ok(())
    }

    /// HTTP client settings.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    /// Fix request options.
    pub fn fix_options(&self) -> FixOptions {
        FixOptions {
            timeout: Duration::from_secs(self.location.timeout_secs),
            max_age: Duration::from_millis(self.location.max_age_ms),
            high_accuracy: self.location.high_accuracy,
        }
    }

    /// Viewport used when no location is available.
    pub fn fallback_viewport(&self) -> Result<Viewport, ConfigFileError> {
        Viewport::new(
            self.map.default_latitude,
            self.map.default_longitude,
            self.map.latitude_delta,
            self.map.longitude_delta,
        )
        .map_err(|e| ConfigFileError::InvalidValue {
            key: "map".to_string(),
            value: format!(
                "{}, {}, {}, {}",
                self.map.default_latitude,
                self.map.default_longitude,
                self.map.latitude_delta,
                self.map.longitude_delta
            ),
            reason: e.to_string(),
        })
    }
}

/// `~/.sellermap`, if the home directory is known.
pub fn config_directory() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// `~/.sellermap/config.ini`, if the home directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    config_directory().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
