//! Orchestrator configuration.

use std::time::Duration;

use super::debounce::DEFAULT_DEBOUNCE_WINDOW;
use crate::config::{ConfigFile, ConfigFileError};
use crate::geo::Viewport;
use crate::location::FixOptions;

/// Settings for one [`super::ViewportFetchOrchestrator`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Quiescence window for viewport changes.
    pub debounce_window: Duration,
    /// Options for the startup location fix.
    pub fix_options: FixOptions,
    /// Viewport used when no location is available. Its spans also size the
    /// viewport around a location fix.
    pub fallback_viewport: Viewport,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            fix_options: FixOptions::default(),
            fallback_viewport: Viewport::fallback(),
        }
    }
}

impl OrchestratorConfig {
    /// Derive orchestrator settings from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, ConfigFileError> {
        Ok(Self {
            debounce_window: Duration::from_millis(config.map.debounce_ms),
            fix_options: config.fix_options(),
            fallback_viewport: config.fallback_viewport()?,
        })
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_fix_timeout(mut self, timeout: Duration) -> Self {
        self.fix_options.timeout = timeout;
        self
    }

    pub fn with_fallback_viewport(mut self, viewport: Viewport) -> Self {
        self.fallback_viewport = viewport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.debounce_window, Duration::from_millis(1000));
        assert_eq!(config.fix_options.timeout, Duration::from_secs(15));
        assert_eq!(config.fallback_viewport, Viewport::fallback());
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.map.debounce_ms = 300;
        file.map.default_latitude = 40.0;
        file.location.timeout_secs = 5;

        let config = OrchestratorConfig::from_config_file(&file).unwrap();
        assert_eq!(config.debounce_window, Duration::from_millis(300));
        assert_eq!(config.fix_options.timeout, Duration::from_secs(5));
        assert_eq!(config.fallback_viewport.latitude(), 40.0);
    }

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::default()
            .with_debounce_window(Duration::from_millis(50))
            .with_fix_timeout(Duration::from_secs(1));
        assert_eq!(config.debounce_window, Duration::from_millis(50));
        assert_eq!(config.fix_options.timeout, Duration::from_secs(1));
    }
}
