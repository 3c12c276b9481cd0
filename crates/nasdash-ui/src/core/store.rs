//! App-wide yewdux store.
//!
//! # Design
//! - The credential is process-wide state with an explicit lifecycle:
//!   `init_credential` at boot, `set_credential` on login, `clear_credential`
//!   on logout or when the backend rejects the token.
//! - Views subscribe to the slice through selectors instead of reading
//!   storage themselves.
//! - Polled data stays in per-view stores; nothing fetched is shared here.

use crate::core::auth::{AuthStatus, Credential, SignOutReason};
use yewdux::store::Store;

/// Global application store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct AppStore {
    /// Authentication state.
    pub auth: AuthSlice,
}

/// Shared authentication state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSlice {
    /// Active credential, if any.
    pub credential: Option<Credential>,
    /// Derived signal for routing.
    pub status: AuthStatus,
    /// Reason shown on the login screen after a sign-out.
    pub notice: Option<SignOutReason>,
}

/// Seed the slice from persisted storage at startup.
pub fn init_credential(slice: &mut AuthSlice, stored: Option<Credential>) {
    slice.status = if stored.is_some() {
        AuthStatus::Authenticated
    } else {
        AuthStatus::SignedOut
    };
    slice.credential = stored;
    slice.notice = None;
}

/// Record a successful login.
pub fn set_credential(slice: &mut AuthSlice, credential: Credential) {
    slice.credential = Some(credential);
    slice.status = AuthStatus::Authenticated;
    slice.notice = None;
}

/// Drop the credential. Returns `false` if there was none to clear.
pub fn clear_credential(slice: &mut AuthSlice, reason: SignOutReason) -> bool {
    let had_credential = slice.credential.take().is_some();
    slice.status = AuthStatus::SignedOut;
    if had_credential {
        slice.notice = Some(reason);
    }
    had_credential
}

/// Whether requests can be authenticated.
#[must_use]
pub const fn is_authenticated(slice: &AuthSlice) -> bool {
    matches!(slice.status, AuthStatus::Authenticated)
}

/// Name of the signed-in user.
#[must_use]
pub fn current_username(slice: &AuthSlice) -> Option<&str> {
    slice
        .credential
        .as_ref()
        .map(|credential| credential.username.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("token", "admin").expect("credential")
    }

    #[test]
    fn init_reflects_storage() {
        let mut slice = AuthSlice::default();
        assert_eq!(slice.status, AuthStatus::Unknown);
        init_credential(&mut slice, None);
        assert_eq!(slice.status, AuthStatus::SignedOut);
        init_credential(&mut slice, Some(credential()));
        assert!(is_authenticated(&slice));
        assert_eq!(current_username(&slice), Some("admin"));
    }

    #[test]
    fn login_clears_notice() {
        let mut slice = AuthSlice {
            notice: Some(SignOutReason::Expired),
            ..AuthSlice::default()
        };
        set_credential(&mut slice, credential());
        assert!(is_authenticated(&slice));
        assert!(slice.notice.is_none());
    }

    #[test]
    fn clear_records_reason_once() {
        let mut slice = AuthSlice::default();
        set_credential(&mut slice, credential());
        assert!(clear_credential(&mut slice, SignOutReason::Expired));
        assert_eq!(slice.notice, Some(SignOutReason::Expired));
        assert!(!clear_credential(&mut slice, SignOutReason::Logout));
        assert_eq!(slice.notice, Some(SignOutReason::Expired));
        assert!(!is_authenticated(&slice));
    }
}
