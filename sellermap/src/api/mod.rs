//! REST client for the seller backend.
//!
//! Wraps the JSON endpoints the map client talks to: the viewport seller
//! query plus the session, registration and profile calls. Authentication is
//! cookie based, so a single [`ApiClient`] must be reused across calls for a
//! login to carry over.
//!
//! # Example
//!
//! ```ignore
//! use sellermap::api::{ApiClient, ApiConfig};
//! use sellermap::geo::{Viewport, ViewportQuery};
//!
//! let client = ApiClient::new(&ApiConfig::default())?;
//! let query = ViewportQuery::from_viewport(&Viewport::fallback());
//! let sellers = client.fetch_sellers_in_viewport(&query).await?;
//! ```

mod client;
mod error;
mod service;
mod types;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, SELLERS_PATH};
pub use error::ApiError;
pub use service::{EntityFetchService, SessionApi};
pub use types::{
    LoginCredentials, LoginResponse, LogoutResponse, ProfileData, SellerData, UserData,
};
