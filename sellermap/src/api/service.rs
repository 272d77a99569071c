//! Entity fetch abstraction used by the orchestrator.

use crate::entity::Entity;
use crate::geo::ViewportQuery;
use crate::BoxFuture;

use super::error::ApiError;
use super::types::{LoginCredentials, LoginResponse, LogoutResponse};

/// Fetches the entities inside a viewport.
///
/// One call is one network request; implementations must not retry or
/// cache. The orchestrator holds this as `Arc<dyn EntityFetchService>`,
/// which lets tests substitute scripted responses.
pub trait EntityFetchService: Send + Sync {
    fn fetch_entities(&self, query: ViewportQuery) -> BoxFuture<'_, Result<Vec<Entity>, ApiError>>;
}

/// Session endpoints used by [`crate::session::SessionManager`].
pub trait SessionApi: Send + Sync {
    fn login<'a>(
        &'a self,
        credentials: &'a LoginCredentials,
    ) -> BoxFuture<'a, Result<LoginResponse, ApiError>>;

    fn logout(&self) -> BoxFuture<'_, Result<LogoutResponse, ApiError>>;
}
