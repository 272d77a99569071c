//! Login session management.
//!
//! Tracks the logged-in user on top of the backend's cookie session and
//! mirrors the user id into a [`CredentialStore`] so a later start can
//! restore it. The store is a black box: the platform keychain in the app,
//! [`MemoryCredentialStore`] here.

mod manager;
mod store;

pub use manager::{SessionError, SessionManager, COOKIE_SESSION_PLACEHOLDER};
pub use store::{CredentialStore, Credentials, MemoryCredentialStore, StoreError};
