//! Location provider with a preconfigured answer.

use std::time::Duration;

use super::types::{FixOptions, LocationError, LocationFix, LocationProvider, PermissionStatus};
use crate::BoxFuture;

/// Location provider that always returns the same outcome.
///
/// Used by the CLI (position from flags or config) and by tests that need a
/// denied permission, a platform error, or a slow fix.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    permission: PermissionStatus,
    fix: Result<LocationFix, LocationError>,
    delay: Duration,
}

impl FixedLocationProvider {
    /// Grants permission and returns `fix` immediately.
    pub fn granted(fix: LocationFix) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            fix: Ok(fix),
            delay: Duration::ZERO,
        }
    }

    /// Refuses permission.
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            fix: Err(LocationError::PermissionDenied),
            delay: Duration::ZERO,
        }
    }

    /// Grants permission but fails the fix with `error`.
    pub fn failing(error: LocationError) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            fix: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Wait `delay` before answering a fix request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl LocationProvider for FixedLocationProvider {
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        Box::pin(async move { self.permission })
    }

    fn current_fix(
        &self,
        _options: FixOptions,
    ) -> BoxFuture<'_, Result<LocationFix, LocationError>> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.fix.clone()
        })
    }
}
