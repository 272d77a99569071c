//! Async reqwest client for the seller backend.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::error::ApiError;
use super::service::{EntityFetchService, SessionApi};
use super::types::{
    LoginCredentials, LoginResponse, LogoutResponse, ProfileData, SellerData, UserData,
};
use crate::entity::{Entity, EntityEnvelope};
use crate::geo::{GeoPoint, ViewportQuery};
use crate::BoxFuture;

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the viewport seller query, relative to the base URL.
pub const SELLERS_PATH: &str = "/map/sellers";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL including the API prefix, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON client with a cookie store for the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the sellers inside the circle described by `query`.
    pub async fn fetch_sellers_in_viewport(
        &self,
        query: &ViewportQuery,
    ) -> Result<Vec<Entity>, ApiError> {
        let request = self.client.get(self.url(SELLERS_PATH)).query(&query.params());
        let envelope: EntityEnvelope = self.send("fetch sellers", request).await?;
        Ok(envelope.data)
    }

    /// Register a new account.
    pub async fn register_user(&self, user: &UserData) -> Result<UserData, ApiError> {
        let request = self.client.post(self.url("/users")).json(&json!({ "user": user }));
        self.send("registration", request).await
    }

    /// Start a session. The session cookie is kept by this client.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/sessions"))
            .json(&json!({ "session": credentials }));
        self.send("login", request).await
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        let request = self.client.delete(self.url("/sessions"));
        self.send("logout", request).await
    }

    /// Toggle seller mode for the logged-in user.
    pub async fn update_seller_status(
        &self,
        seller: &SellerData,
    ) -> Result<ProfileData, ApiError> {
        let request = self
            .client
            .put(self.url("/profiles/me/seller"))
            .json(&json!({ "profile": seller }));
        self.send("update seller status", request).await
    }

    /// Publish the logged-in user's position.
    pub async fn update_location(&self, location: &GeoPoint) -> Result<ProfileData, ApiError> {
        let request = self.client.post(self.url("/location")).json(location);
        self.send("update location", request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let result = self.send_inner(request).await;
        if let Err(ref e) = result {
            warn!(operation, error = %e, "API call failed");
        }
        result
    }

    async fn send_inner<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: if body.is_empty() { None } else { Some(body) },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl EntityFetchService for ApiClient {
    fn fetch_entities(&self, query: ViewportQuery) -> BoxFuture<'_, Result<Vec<Entity>, ApiError>> {
        Box::pin(async move { self.fetch_sellers_in_viewport(&query).await })
    }
}

impl SessionApi for ApiClient {
    fn login<'a>(
        &'a self,
        credentials: &'a LoginCredentials,
    ) -> BoxFuture<'a, Result<LoginResponse, ApiError>> {
        Box::pin(ApiClient::login(self, credentials))
    }

    fn logout(&self) -> BoxFuture<'_, Result<LogoutResponse, ApiError>> {
        Box::pin(ApiClient::logout(self))
    }
}
