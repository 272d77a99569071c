//! Location provider trait and its value types.

use std::time::Duration;

use thiserror::Error;

use crate::geo::GeoPoint;
use crate::BoxFuture;

/// Bounded wait for a location fix before it is treated as a failure.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(15);

/// Oldest cached fix the provider may return.
pub const DEFAULT_FIX_MAX_AGE: Duration = Duration::from_secs(10);

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// A single device position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub position: GeoPoint,
    /// Horizontal accuracy in meters, when the platform reports one.
    pub accuracy_m: Option<f64>,
}

impl LocationFix {
    pub fn new(position: GeoPoint) -> Self {
        Self {
            position,
            accuracy_m: None,
        }
    }
}

/// Options passed through to the platform fix request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub timeout: Duration,
    pub max_age: Duration,
    pub high_accuracy: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FIX_TIMEOUT,
            max_age: DEFAULT_FIX_MAX_AGE,
            high_accuracy: true,
        }
    }
}

/// Failures while obtaining a location. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No fix arrived within the bounded wait.
    #[error("Location request timed out after {0:?}")]
    Timeout(Duration),

    /// The platform reported an error code.
    #[error("Location unavailable (code {code}): {message}")]
    Unavailable { code: i32, message: String },
}

/// Source of device coordinates.
///
/// Uses boxed futures so implementations can be held as
/// `Arc<dyn LocationProvider>` by the orchestrator.
pub trait LocationProvider: Send + Sync {
    /// Ask the user for location access.
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus>;

    /// Obtain the current position.
    ///
    /// Implementations should honour `options.timeout`; callers enforce it
    /// regardless.
    fn current_fix(&self, options: FixOptions) -> BoxFuture<'_, Result<LocationFix, LocationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fix_options() {
        let options = FixOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(options.max_age, Duration::from_secs(10));
        assert!(options.high_accuracy);
    }

    #[test]
    fn test_location_error_display() {
        let err = LocationError::Unavailable {
            code: 2,
            message: "no provider".to_string(),
        };
        assert_eq!(err.to_string(), "Location unavailable (code 2): no provider");
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
    }
}
