//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::str::FromStr;

use super::file::{expand_tilde, ConfigFile, ConfigFileError};

/// Every setting the configuration file understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiBaseUrl,
    ApiTimeoutSecs,
    MapDebounceMs,
    MapDefaultLatitude,
    MapDefaultLongitude,
    MapLatitudeDelta,
    MapLongitudeDelta,
    LocationTimeoutSecs,
    LocationMaxAgeMs,
    LocationHighAccuracy,
    LoggingFile,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::ApiBaseUrl,
    ConfigKey::ApiTimeoutSecs,
    ConfigKey::MapDebounceMs,
    ConfigKey::MapDefaultLatitude,
    ConfigKey::MapDefaultLongitude,
    ConfigKey::MapLatitudeDelta,
    ConfigKey::MapLongitudeDelta,
    ConfigKey::LocationTimeoutSecs,
    ConfigKey::LocationMaxAgeMs,
    ConfigKey::LocationHighAccuracy,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl | ConfigKey::ApiTimeoutSecs => "api",
            ConfigKey::MapDebounceMs
            | ConfigKey::MapDefaultLatitude
            | ConfigKey::MapDefaultLongitude
            | ConfigKey::MapLatitudeDelta
            | ConfigKey::MapLongitudeDelta => "map",
            ConfigKey::LocationTimeoutSecs
            | ConfigKey::LocationMaxAgeMs
            | ConfigKey::LocationHighAccuracy => "location",
            ConfigKey::LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl => "base_url",
            ConfigKey::ApiTimeoutSecs => "timeout_secs",
            ConfigKey::MapDebounceMs => "debounce_ms",
            ConfigKey::MapDefaultLatitude => "default_latitude",
            ConfigKey::MapDefaultLongitude => "default_longitude",
            ConfigKey::MapLatitudeDelta => "latitude_delta",
            ConfigKey::MapLongitudeDelta => "longitude_delta",
            ConfigKey::LocationTimeoutSecs => "timeout_secs",
            ConfigKey::LocationMaxAgeMs => "max_age_ms",
            ConfigKey::LocationHighAccuracy => "high_accuracy",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as it would appear in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ApiBaseUrl => config.api.base_url.clone(),
            ConfigKey::ApiTimeoutSecs => config.api.timeout_secs.to_string(),
            ConfigKey::MapDebounceMs => config.map.debounce_ms.to_string(),
            ConfigKey::MapDefaultLatitude => config.map.default_latitude.to_string(),
            ConfigKey::MapDefaultLongitude => config.map.default_longitude.to_string(),
            ConfigKey::MapLatitudeDelta => config.map.latitude_delta.to_string(),
            ConfigKey::MapLongitudeDelta => config.map.longitude_delta.to_string(),
            ConfigKey::LocationTimeoutSecs => config.location.timeout_secs.to_string(),
            ConfigKey::LocationMaxAgeMs => config.location.max_age_ms.to_string(),
            ConfigKey::LocationHighAccuracy => config.location.high_accuracy.to_string(),
            ConfigKey::LoggingFile => config.logging.file.display().to_string(),
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        let value = value.trim();
        match self {
            ConfigKey::ApiBaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(self.invalid(value, "must start with http:// or https://"));
                }
                config.api.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::ApiTimeoutSecs => config.api.timeout_secs = self.parse_positive(value)?,
            ConfigKey::MapDebounceMs => config.map.debounce_ms = self.parse_positive(value)?,
            ConfigKey::MapDefaultLatitude => {
                config.map.default_latitude = self.parse_f64(value, -90.0, 90.0)?
            }
            ConfigKey::MapDefaultLongitude => {
                config.map.default_longitude = self.parse_f64(value, -180.0, 180.0)?
            }
            ConfigKey::MapLatitudeDelta => config.map.latitude_delta = self.parse_span(value)?,
            ConfigKey::MapLongitudeDelta => config.map.longitude_delta = self.parse_span(value)?,
            ConfigKey::LocationTimeoutSecs => {
                config.location.timeout_secs = self.parse_positive(value)?
            }
            ConfigKey::LocationMaxAgeMs => {
                config.location.max_age_ms = value
                    .parse()
                    .map_err(|_| self.invalid(value, "expected a whole number"))?
            }
            ConfigKey::LocationHighAccuracy => {
                config.location.high_accuracy = match value.to_lowercase().as_str() {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => return Err(self.invalid(value, "expected true or false")),
                }
            }
            ConfigKey::LoggingFile => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn parse_positive(&self, value: &str) -> Result<u64, ConfigFileError> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(self.invalid(value, "expected a positive whole number")),
        }
    }

    fn parse_f64(&self, value: &str, min: f64, max: f64) -> Result<f64, ConfigFileError> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && (min..=max).contains(&n) => Ok(n),
            _ => Err(self.invalid(value, &format!("expected a number in [{}, {}]", min, max))),
        }
    }

    fn parse_span(&self, value: &str) -> Result<f64, ConfigFileError> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
            _ => Err(self.invalid(value, "expected a number greater than 0")),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ConfigFileError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
