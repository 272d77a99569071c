//! Session lifecycle on top of the API and the credential store.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use super::store::{CredentialStore, Credentials, StoreError};
use crate::api::{ApiError, LoginCredentials, LoginResponse, SessionApi};

/// User id recorded when the server sets a cookie but returns no user id.
pub const COOKIE_SESSION_PLACEHOLDER: &str = "authenticated";

/// Secret stored alongside the user id. The cookie is the real credential.
const STORED_SECRET: &str = "session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Login failed: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tracks who is logged in.
pub struct SessionManager {
    api: Arc<dyn SessionApi>,
    store: Arc<dyn CredentialStore>,
    user_id: RwLock<Option<String>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn SessionApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            store,
            user_id: RwLock::new(None),
        }
    }

    /// Load a previously stored session.
    ///
    /// An unreadable store is logged and treated as logged out.
    pub fn restore(&self) -> Option<String> {
        let restored = match self.store.load() {
            Ok(Some(credentials)) => {
                info!(user = %credentials.username, "Credentials loaded");
                Some(credentials.username)
            }
            Ok(None) => {
                info!("No credentials stored");
                None
            }
            Err(e) => {
                warn!(error = %e, "Credential store could not be accessed");
                None
            }
        };

        *self.user_id.write() = restored.clone();
        restored
    }

    /// Log in and remember the returned user.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, SessionError> {
        let credentials = LoginCredentials {
            email: email.into(),
            password: password.into(),
        };
        let response = self.api.login(&credentials).await?;

        match response.user_id {
            Some(id) => {
                let id = id.to_string();
                *self.user_id.write() = Some(id.clone());
                self.store.save(Credentials {
                    username: id.clone(),
                    secret: STORED_SECRET.to_string(),
                })?;
                info!(user = %id, "Credentials saved");
            }
            None => {
                *self.user_id.write() = Some(COOKIE_SESSION_PLACEHOLDER.to_string());
                info!("Login successful, relying on session cookie");
            }
        }

        Ok(response)
    }

    /// Log out.
    ///
    /// The local session is cleared even when the server call fails; only a
    /// failure to reset the credential store is returned.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        *self.user_id.write() = None;
        self.store.reset()?;
        info!("Credentials reset");
        Ok(())
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.read().is_some()
    }
}
