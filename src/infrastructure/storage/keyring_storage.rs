//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::SessionToken;
use crate::domain::errors::MessengerError;
use crate::domain::ports::SessionStoragePort;

const KEYRING_SERVICE: &str = "termgram";
const KEYRING_USER: &str = "session";

/// System keyring session storage adapter.
pub struct KeyringSessionStorage {
    service: String,
    user: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, MessengerError> {
        Entry::new(&self.service, &self.user).map_err(|e| {
            MessengerError::session("failed to access keyring").with_source(e)
        })
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn get_session(&self) -> Result<Option<SessionToken>, MessengerError> {
        debug!(service = %self.service, "Retrieving session from keyring");

        match self.entry()?.get_password() {
            Ok(secret) => {
                debug!("Session found in keyring");
                Ok(SessionToken::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No session stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve session from keyring");
                Err(MessengerError::session("failed to read keyring").with_source(e))
            }
        }
    }

    async fn store_session(&self, token: &SessionToken) -> Result<(), MessengerError> {
        debug!(service = %self.service, "Storing session in keyring");

        self.entry()?.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store session in keyring");
            MessengerError::session("failed to write keyring").with_source(e)
        })
    }

    async fn delete_session(&self) -> Result<(), MessengerError> {
        debug!(service = %self.service, "Deleting session from keyring");

        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to delete session from keyring");
                Err(MessengerError::session("failed to delete from keyring").with_source(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_session() {
        let storage = KeyringSessionStorage::with_names("termgram-test", "test-session");
        let token = SessionToken::new_unchecked("0123456789abcdef0123456789abcdef");

        storage.store_session(&token).await.unwrap();

        let retrieved = storage.get_session().await.unwrap();
        assert_eq!(retrieved.unwrap().as_str(), token.as_str());

        storage.delete_session().await.unwrap();
        assert!(!storage.has_session().await.unwrap());
    }
}
