//! Session storage port definition.

use async_trait::async_trait;

use crate::domain::entities::SessionToken;
use crate::domain::errors::MessengerError;

/// Port for session persistence operations.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Retrieves stored session.
    async fn get_session(&self) -> Result<Option<SessionToken>, MessengerError>;

    /// Stores session securely.
    async fn store_session(&self, token: &SessionToken) -> Result<(), MessengerError>;

    /// Deletes stored session.
    async fn delete_session(&self) -> Result<(), MessengerError>;

    /// Checks if a session exists.
    async fn has_session(&self) -> Result<bool, MessengerError> {
        Ok(self.get_session().await?.is_some())
    }
}
