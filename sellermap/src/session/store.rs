//! Credential store abstraction.

use parking_lot::Mutex;
use thiserror::Error;

/// Stored session credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Key under which the session is stored (the user id).
    pub username: String,
    pub secret: String,
}

/// Errors from the backing secure store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Secure key-value storage for a single set of credentials.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credentials>, StoreError>;

    fn save(&self, credentials: Credentials) -> Result<(), StoreError>;

    fn reset(&self) -> Result<(), StoreError>;
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `credentials`.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, credentials: Credentials) -> Result<(), StoreError> {
        *self.slot.lock() = Some(credentials);
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
