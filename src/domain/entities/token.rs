//! Backend session token value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Session credential for the messaging backend, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    const MIN_TOKEN_LENGTH: usize = 16;

    /// Creates new token with format validation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.len() < Self::MIN_TOKEN_LENGTH {
            return None;
        }

        if value.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self { value })
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token() {
        let token = SessionToken::new("  abcdefghijklmnopqrstuvwxyz  ");
        assert_eq!(token.unwrap().as_str(), "abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_rejects_short_token() {
        assert!(SessionToken::new("short").is_none());
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert!(SessionToken::new("abcdefgh ijklmnopqrst").is_none());
    }

    #[test]
    fn test_debug_is_masked() {
        let token = SessionToken::new_unchecked("abcdefghijklmnopqrstuvwxyz");
        let debug = format!("{token:?}");
        assert!(debug.contains("abcd...wxyz"));
        assert!(!debug.contains("efghijkl"));
    }
}
