//! Authentication DTOs.

use crate::domain::entities::UserInfo;

/// Where a session token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    /// Token from environment variable or command line flag.
    CommandLine,
    /// Token from system keyring.
    Keyring,
    /// Token typed at the login prompt.
    UserInput,
}

impl SessionSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CommandLine => "command line / environment",
            Self::Keyring => "system keyring",
            Self::UserInput => "user input",
        }
    }
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub token: String,
    pub source: SessionSource,
    pub persist: bool,
}

impl LoginRequest {
    #[must_use]
    pub const fn new(token: String, source: SessionSource) -> Self {
        Self {
            token,
            source,
            persist: true,
        }
    }

    /// Disables session persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Account the session belongs to.
    pub account: UserInfo,
    pub source: SessionSource,
    pub persisted: bool,
}
