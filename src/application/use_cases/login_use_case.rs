//! Login and logout.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::domain::entities::SessionToken;
use crate::domain::errors::MessengerError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Validates a session against the backend and stores it.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
}

impl LoginUseCase {
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn SessionStoragePort>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
        }
    }

    /// Executes login with provided request.
    ///
    /// # Errors
    /// Returns error if the token is malformed or rejected by the backend.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, MessengerError> {
        debug!(source = %request.source, "Attempting login");

        let token = SessionToken::new(&request.token).ok_or_else(|| {
            warn!("Invalid session token format provided");
            MessengerError::session("token is too short or contains whitespace")
        })?;

        let account = self.auth_port.validate_session(&token).await.map_err(|e| {
            warn!(error = %e, code = e.code(), "Session validation failed");
            e
        })?;

        info!(user_id = account.peer.id, name = %account.name, "Successfully authenticated");

        let persisted = if request.persist {
            match self.storage_port.store_session(&token).await {
                Ok(()) => {
                    info!("Session persisted to secure storage");
                    true
                }
                Err(e) => {
                    error!(error = %e, "Failed to persist session to secure storage");
                    false
                }
            }
        } else {
            debug!("Session persistence disabled, skipping storage");
            false
        };

        Ok(LoginResponse {
            account,
            source: request.source,
            persisted,
        })
    }

    /// Deletes the stored session.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn logout(&self) -> Result<(), MessengerError> {
        debug!("Deleting session from secure storage");
        self.storage_port.delete_session().await.map_err(|e| {
            error!(error = %e, "Failed to delete session from secure storage");
            e
        })?;
        info!("Session deleted from secure storage");
        Ok(())
    }
}
