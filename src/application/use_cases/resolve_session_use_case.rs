//! Session resolution use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::SessionSource;
use crate::domain::entities::SessionToken;
use crate::domain::errors::MessengerError;
use crate::domain::ports::SessionStoragePort;

/// Resolved session with its source.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub token: SessionToken,
    pub source: SessionSource,
}

/// Finds the session to start the client with.
pub struct ResolveSessionUseCase {
    storage_port: Arc<dyn SessionStoragePort>,
}

impl ResolveSessionUseCase {
    #[must_use]
    pub const fn new(storage_port: Arc<dyn SessionStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Resolves the session from the command line or the keyring.
    ///
    /// An explicit token wins over the stored one so a different account
    /// can be used without logging out.
    ///
    /// # Errors
    /// Never fails on storage problems; those are logged and treated as
    /// "no stored session".
    pub async fn execute(
        &self,
        cli_token: Option<String>,
    ) -> Result<Option<ResolvedSession>, MessengerError> {
        if let Some(raw) = cli_token.filter(|s| !s.trim().is_empty()) {
            if let Some(token) = SessionToken::new(raw) {
                info!("Using session from command line / environment");
                return Ok(Some(ResolvedSession {
                    token,
                    source: SessionSource::CommandLine,
                }));
            }
            debug!("Command-line session token has invalid format");
        }

        debug!("Checking keyring for stored session");
        match self.storage_port.get_session().await {
            Ok(Some(token)) => {
                info!("Using session from system keyring");
                Ok(Some(ResolvedSession {
                    token,
                    source: SessionSource::Keyring,
                }))
            }
            Ok(None) => {
                debug!("No session found in any source");
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, "Failed to check keyring");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockSessionStorage;

    const STORED: &str = "storedstoredstoredstored";
    const CLI: &str = "clicliclicliclicliclicli";

    #[tokio::test]
    async fn test_cli_token_wins() {
        let storage = Arc::new(MockSessionStorage::with_session(SessionToken::new_unchecked(
            STORED,
        )));
        let use_case = ResolveSessionUseCase::new(storage);

        let resolved = use_case.execute(Some(CLI.to_string())).await.unwrap().unwrap();

        assert_eq!(resolved.source, SessionSource::CommandLine);
        assert_eq!(resolved.token.as_str(), CLI);
    }

    #[tokio::test]
    async fn test_keyring_fallback() {
        let storage = Arc::new(MockSessionStorage::with_session(SessionToken::new_unchecked(
            STORED,
        )));
        let use_case = ResolveSessionUseCase::new(storage);

        let resolved = use_case.execute(Some("bad".to_string())).await.unwrap().unwrap();

        assert_eq!(resolved.source, SessionSource::Keyring);
    }

    #[tokio::test]
    async fn test_no_session_found() {
        let use_case = ResolveSessionUseCase::new(Arc::new(MockSessionStorage::new()));
        assert!(use_case.execute(None).await.unwrap().is_none());
    }
}
