//! Viewport and coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE, DEFAULT_LATITUDE_DELTA,
    DEFAULT_LONGITUDE_DELTA,
};

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors raised when constructing geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// A viewport span that is not strictly positive.
    #[error("Invalid viewport span: {0} (must be > 0)")]
    InvalidSpan(f64),
}

/// A latitude/longitude pair in degrees.
///
/// Serialized as `{ "latitude": .., "longitude": .. }`, the shape the backend
/// uses for seller locations and location updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// The visible map region: a center point plus latitude/longitude spans.
///
/// Spans are always strictly positive. Construct through [`Viewport::new`]
/// or one of the helpers; the fields are read-only from outside the module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    latitude: f64,
    longitude: f64,
    latitude_delta: f64,
    longitude_delta: f64,
}

impl Viewport {
    /// Create a viewport.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] when the center is out of range or either span is
    /// not a finite positive number.
    pub fn new(
        latitude: f64,
        longitude: f64,
        latitude_delta: f64,
        longitude_delta: f64,
    ) -> Result<Self, GeoError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        validate_span(latitude_delta)?;
        validate_span(longitude_delta)?;

        Ok(Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        })
    }

    /// Viewport centered on `center` using the default spans.
    pub fn around(center: GeoPoint) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            longitude_delta: DEFAULT_LONGITUDE_DELTA,
        }
    }

    /// Same spans as `self`, moved to `center`.
    pub fn centered_on(&self, center: GeoPoint) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            ..*self
        }
    }

    /// The hard-coded fallback viewport used when no location is available.
    pub fn fallback() -> Self {
        Self {
            latitude: DEFAULT_CENTER_LATITUDE,
            longitude: DEFAULT_CENTER_LONGITUDE,
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            longitude_delta: DEFAULT_LONGITUDE_DELTA,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude_delta(&self) -> f64 {
        self.latitude_delta
    }

    pub fn longitude_delta(&self) -> f64 {
        self.longitude_delta
    }

    /// Center of the viewport.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Check whether a point lies inside the visible region.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let half_lat = self.latitude_delta / 2.0;
        let half_lon = self.longitude_delta / 2.0;
        (point.latitude - self.latitude).abs() <= half_lat
            && (point.longitude - self.longitude).abs() <= half_lon
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.5}, {:.5}) span {:.4}x{:.4}",
            self.latitude, self.longitude, self.latitude_delta, self.longitude_delta
        )
    }
}

fn validate_latitude(lat: f64) -> Result<(), GeoError> {
    if lat.is_finite() && (MIN_LAT..=MAX_LAT).contains(&lat) {
        Ok(())
    } else {
        Err(GeoError::InvalidLatitude(lat))
    }
}

fn validate_longitude(lon: f64) -> Result<(), GeoError> {
    if lon.is_finite() && (MIN_LON..=MAX_LON).contains(&lon) {
        Ok(())
    } else {
        Err(GeoError::InvalidLongitude(lon))
    }
}

fn validate_span(span: f64) -> Result<(), GeoError> {
    if span.is_finite() && span > 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidSpan(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_new_valid() {
        let vp = Viewport::new(37.78825, -122.4324, 0.0922, 0.0421).unwrap();
        assert_eq!(vp.latitude(), 37.78825);
        assert_eq!(vp.longitude(), -122.4324);
        assert_eq!(vp.latitude_delta(), 0.0922);
        assert_eq!(vp.longitude_delta(), 0.0421);
    }

    #[test]
    fn test_viewport_rejects_non_positive_span() {
        assert_eq!(
            Viewport::new(0.0, 0.0, 0.0, 0.1),
            Err(GeoError::InvalidSpan(0.0))
        );
        assert_eq!(
            Viewport::new(0.0, 0.0, 0.1, -1.0),
            Err(GeoError::InvalidSpan(-1.0))
        );
        assert!(Viewport::new(0.0, 0.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_viewport_rejects_out_of_range_center() {
        assert_eq!(
            Viewport::new(91.0, 0.0, 0.1, 0.1),
            Err(GeoError::InvalidLatitude(91.0))
        );
        assert_eq!(
            Viewport::new(0.0, -180.5, 0.1, 0.1),
            Err(GeoError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn test_fallback_matches_default_region() {
        let vp = Viewport::fallback();
        assert_eq!(
            vp,
            Viewport::new(37.78825, -122.4324, 0.0922, 0.0421).unwrap()
        );
    }

    #[test]
    fn test_around_uses_default_spans() {
        let center = GeoPoint::new(51.5074, -0.1278).unwrap();
        let vp = Viewport::around(center);
        assert_eq!(vp.center(), center);
        assert_eq!(vp.latitude_delta(), DEFAULT_LATITUDE_DELTA);
        assert_eq!(vp.longitude_delta(), DEFAULT_LONGITUDE_DELTA);
    }

    #[test]
    fn test_centered_on_keeps_spans() {
        let wide = Viewport::new(0.0, 0.0, 0.5, 0.25).unwrap();
        let moved = wide.centered_on(GeoPoint::new(-33.87, 151.21).unwrap());

        assert_eq!(moved, Viewport::new(-33.87, 151.21, 0.5, 0.25).unwrap());
    }

    #[test]
    fn test_contains() {
        let vp = Viewport::new(10.0, 20.0, 2.0, 4.0).unwrap();
        assert!(vp.contains(&GeoPoint::new(10.5, 21.5).unwrap()));
        assert!(vp.contains(&GeoPoint::new(9.0, 18.0).unwrap()));
        assert!(!vp.contains(&GeoPoint::new(11.5, 20.0).unwrap()));
        assert!(!vp.contains(&GeoPoint::new(10.0, 22.5).unwrap()));
    }

    #[test]
    fn test_geo_point_serde_shape() {
        let point = GeoPoint::new(1.5, -2.25).unwrap();
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"latitude":1.5,"longitude":-2.25}"#);
    }
}
