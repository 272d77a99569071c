//! Device location abstraction.
//!
//! The map screen asks for location permission once and then takes a single
//! fix to center the initial viewport. Platform geolocation lives behind the
//! [`LocationProvider`] trait; [`FixedLocationProvider`] serves headless runs
//! and tests.

mod fixed;
mod types;

pub use fixed::FixedLocationProvider;
pub use types::{
    FixOptions, LocationError, LocationFix, LocationProvider, PermissionStatus,
    DEFAULT_FIX_MAX_AGE, DEFAULT_FIX_TIMEOUT,
};
