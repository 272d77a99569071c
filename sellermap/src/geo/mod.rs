//! Geographic primitives for the map view.
//!
//! Provides the viewport model shared by the renderer, the location provider
//! and the entity fetch service, plus the conversion from a viewport to the
//! center-and-radius query the backend understands.

mod query;
mod types;

pub use query::{ViewportQuery, METERS_PER_DEGREE_LAT};
pub use types::{GeoError, GeoPoint, Viewport, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Latitude span used when a viewport is synthesized from a location fix.
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;

/// Longitude span used when a viewport is synthesized from a location fix.
pub const DEFAULT_LONGITUDE_DELTA: f64 = 0.0421;

/// Center latitude of the fallback viewport (San Francisco).
pub const DEFAULT_CENTER_LATITUDE: f64 = 37.78825;

/// Center longitude of the fallback viewport (San Francisco).
pub const DEFAULT_CENTER_LONGITUDE: f64 = -122.4324;
