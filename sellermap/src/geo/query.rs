//! Viewport to backend query conversion.
//!
//! The seller endpoint takes a center and a radius in meters rather than a
//! bounding box. The radius is half the viewport diagonal so that the circle
//! covers every visible corner.

use super::Viewport;

/// Approximate length of one degree of latitude in meters.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Center-and-radius query sent to the entity fetch service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in whole meters (at least 1).
    pub radius: u32,
}

impl ViewportQuery {
    /// Build the query covering `viewport`.
    pub fn from_viewport(viewport: &Viewport) -> Self {
        let lat = viewport.latitude();
        let lon = viewport.longitude();

        let half_height_m = viewport.latitude_delta() / 2.0 * METERS_PER_DEGREE_LAT;
        let half_width_m =
            viewport.longitude_delta() / 2.0 * METERS_PER_DEGREE_LAT * lat.to_radians().cos();

        let radius = half_height_m.hypot(half_width_m.abs()).ceil();
        let radius = radius.clamp(1.0, u32::MAX as f64) as u32;

        Self { lat, lon, radius }
    }

    /// Query string parameters in the order the backend documents them.
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("radius", self.radius.to_string()),
        ]
    }
}

impl From<&Viewport> for ViewportQuery {
    fn from(viewport: &Viewport) -> Self {
        Self::from_viewport(viewport)
    }
}
