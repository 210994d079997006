//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{SessionToken, UserInfo};
use crate::domain::errors::MessengerError;

/// Port for session validation.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Validates the token and returns the account it belongs to.
    async fn validate_session(&self, token: &SessionToken) -> Result<UserInfo, MessengerError>;
}
