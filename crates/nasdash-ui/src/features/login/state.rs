//! Login form validation and the token exchange.

use nasdash_api_models::{LoginForm, TokenResponse};

use crate::core::auth::Credential;
use crate::core::backend::{SharedBackend, paths};
use crate::core::error::ApiError;
use crate::core::poll::FetchFuture;

/// Shown when sign-in fails without a backend detail.
pub const FAILURE_MESSAGE: &str = "登录失败，请检查用户名和密码";

/// Editable sign-in form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginFormState {
    /// Username input.
    pub username: String,
    /// Password input.
    pub password: String,
}

impl LoginFormState {
    /// Both fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }

    /// Fields to post, with the username trimmed.
    #[must_use]
    pub fn to_form(&self) -> LoginForm {
        LoginForm {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Exchange the form for a credential.
///
/// The backend expects an OAuth2 password form; a response without a token is
/// reported as a decode error.
pub fn sign_in(backend: &SharedBackend, form: &LoginForm) -> FetchFuture<Credential> {
    let username = form.username.clone();
    let pending = backend.post_form(
        paths::AUTH_LOGIN,
        &[("username", username.as_str()), ("password", form.password.as_str())],
    );
    Box::pin(async move {
        let value = pending.await?;
        let token: TokenResponse = serde_json::from_value(value).map_err(ApiError::decode)?;
        Credential::new(token.access_token, username)
            .ok_or_else(|| ApiError::decode("empty access token"))
    })
}

/// Message for a failed sign-in.
#[must_use]
pub fn error_message(error: &ApiError) -> String {
    error.detail_or(FAILURE_MESSAGE)
}
