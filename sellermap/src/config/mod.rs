//! Configuration file support.
//!
//! Settings live in an INI file at `~/.sellermap/config.ini`. Every key is
//! optional; a missing file yields the defaults.
//!
//! `[map]` describes the startup viewport: `default_latitude` and
//! `default_longitude` center it when no location is available, and the two
//! deltas size it whether it is centered on the device or on the default.
//!
//! ```ini
//! [api]
//! base_url = http://localhost:4000/api
//! timeout_secs = 30
//!
//! [map]
//! debounce_ms = 1000
//! default_latitude = 37.78825
//! default_longitude = -122.4324
//! latitude_delta = 0.0922
//! longitude_delta = 0.0421
//!
//! [location]
//! timeout_secs = 15
//! max_age_ms = 10000
//! high_accuracy = true
//!
//! [logging]
//! file = ~/.sellermap/sellermap.log
//! ```

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, expand_tilde, ApiSettings, ConfigFile, ConfigFileError,
    LocationSettings, LoggingSettings, MapSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
pub use keys::ConfigKey;
