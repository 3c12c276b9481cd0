//! Bearer credential held for the signed-in user.
//!
//! # Design
//! - Keep the credential as plain data; persistence and header encoding
//!   happen at the edges.
//! - A blank token is never a credential.

use crate::core::http::bearer_header;

/// Token issued at login plus the account it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token.
    pub token: String,
    /// Account name shown in the shell.
    pub username: String,
}

impl Credential {
    /// Build a credential, rejecting blank tokens.
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self {
            token,
            username: username.into(),
        })
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        bearer_header(&self.token)
    }
}

/// Authentication signal consumed by routing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// Storage not read yet.
    #[default]
    Unknown,
    /// A credential is present.
    Authenticated,
    /// No credential; the login screen is shown.
    SignedOut,
}

/// Why the credential was cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignOutReason {
    /// The user logged out.
    Logout,
    /// The backend rejected the credential.
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(Credential::new("", "admin").is_none());
        assert!(Credential::new("   ", "admin").is_none());
        assert!(Credential::new("abc", "admin").is_some());
    }

    #[test]
    fn bearer_uses_token() {
        let credential = Credential::new("abc.def", "admin").expect("credential");
        assert_eq!(credential.bearer(), "Bearer abc.def");
    }
}
