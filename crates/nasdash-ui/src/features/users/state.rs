//! User list resource, form state, and CRUD mutations.
//!
//! # Design
//! - The list loads once and is refetched after each mutation.
//! - Form inputs stay as strings; they become request bodies only on submit.

use nasdash_api_models::{User, UserCreate, UserUpdate};
use thiserror::Error;

use crate::core::backend::{Method, SharedBackend, fetcher, paths, send, send_empty};
use crate::core::http::encode_segment;
use crate::core::poll::{Cadence, FetchFuture, PollGroup, Resource};

/// Shown when the list cannot be loaded.
pub const FAILURE_MESSAGE: &str = "获取用户列表失败";
/// Shown when create or update fails without a backend detail.
pub const SAVE_FAILURE_MESSAGE: &str = "操作失败";
/// Shown when delete fails without a backend detail.
pub const DELETE_FAILURE_MESSAGE: &str = "删除失败";

/// Resource key for the user list.
pub const USERS: &str = "users";

/// Handle to the user list.
#[derive(Clone, Debug, PartialEq)]
pub struct UsersResources {
    /// All accounts.
    pub users: Resource<Vec<User>>,
}

impl UsersResources {
    /// Bind the user endpoint to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            users: Resource::new(USERS, fetcher(backend, paths::USERS)),
        }
    }

    /// One-shot group; refreshes are explicit.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("users")
            .resource(&self.users)
            .cadence(Cadence::Once)
            .failure_message(failure_message)
            .build()
    }
}

/// Client-side form rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UserFormError {
    /// Blank username.
    #[error("username is required")]
    MissingUsername,
    /// Blank password on create.
    #[error("password is required")]
    MissingPassword,
}

impl UserFormError {
    /// Translation key for the message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::MissingUsername => "users.errors.username_required",
            Self::MissingPassword => "users.errors.password_required",
        }
    }
}

/// Validated request produced by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserRequest {
    /// New account.
    Create(UserCreate),
    /// Change to the account currently named `username`.
    Update {
        /// Name before the edit.
        username: String,
        /// Fields to apply.
        body: UserUpdate,
    },
}

/// Editable form state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFormState {
    /// Login name input.
    pub username: String,
    /// Password input; blank keeps the current password on edit.
    pub password: String,
    /// Disabled checkbox.
    pub disabled: bool,
    /// Account being edited, if any.
    pub editing: Option<String>,
}

impl UserFormState {
    /// Form prefilled for editing `user`.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            disabled: user.disabled,
            editing: Some(user.username.clone()),
        }
    }

    /// Whether the form edits an existing account.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`UserFormError`] when a required field is blank.
    pub fn to_request(&self) -> Result<UserRequest, UserFormError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UserFormError::MissingUsername);
        }
        let blank_password = self.password.trim().is_empty();
        match &self.editing {
            Some(original) => Ok(UserRequest::Update {
                username: original.clone(),
                body: UserUpdate {
                    username: username.to_string(),
                    password: (!blank_password).then(|| self.password.clone()),
                    disabled: self.disabled,
                },
            }),
            None if blank_password => Err(UserFormError::MissingPassword),
            None => Ok(UserRequest::Create(UserCreate {
                username: username.to_string(),
                password: self.password.clone(),
                disabled: self.disabled,
            })),
        }
    }
}

fn user_path(username: &str) -> String {
    format!("{}{}", paths::USERS, encode_segment(username))
}

/// Send a validated form request.
pub fn save_user(backend: &SharedBackend, request: &UserRequest) -> FetchFuture<User> {
    match request {
        UserRequest::Create(body) => send(backend, Method::Post, paths::USERS, body),
        UserRequest::Update { username, body } => {
            send(backend, Method::Put, &user_path(username), body)
        }
    }
}

/// Delete the account named `username`.
pub fn delete_user(backend: &SharedBackend, username: &str) -> FetchFuture<()> {
    send_empty(backend, Method::Delete, &user_path(username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::testing::ScriptedBackend;
    use crate::core::poll::ManualScheduler;
    use serde_json::json;
    use std::rc::Rc;
    use std::time::Duration;

    fn user(username: &str) -> User {
        serde_json::from_value(json!({
            "id": "u-1", "username": username, "disabled": false,
            "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"
        }))
        .expect("user")
    }

    #[test]
    fn create_requires_username_and_password() {
        let mut form = UserFormState::default();
        assert_eq!(form.to_request(), Err(UserFormError::MissingUsername));
        form.username = "ops".to_string();
        assert_eq!(form.to_request(), Err(UserFormError::MissingPassword));
        form.password = "s3cret".to_string();
        assert!(matches!(form.to_request(), Ok(UserRequest::Create(_))));
    }

    #[test]
    fn password_is_sent_as_typed() {
        let mut form = UserFormState {
            username: " ops ".to_string(),
            password: " pw ".to_string(),
            ..UserFormState::default()
        };
        let Ok(UserRequest::Create(body)) = form.to_request() else {
            panic!("expected create");
        };
        assert_eq!(body.username, "ops");
        assert_eq!(body.password, " pw ");

        form = UserFormState::from_user(&user("ops"));
        form.password = " next ".to_string();
        let Ok(UserRequest::Update { body, .. }) = form.to_request() else {
            panic!("expected update");
        };
        assert_eq!(body.password.as_deref(), Some(" next "));

        form.password = "   ".to_string();
        let Ok(UserRequest::Update { body, .. }) = form.to_request() else {
            panic!("expected update");
        };
        assert_eq!(body.password, None);
    }

    #[test]
    fn edit_keeps_password_when_blank() {
        let mut form = UserFormState::from_user(&user("ops"));
        assert!(form.is_edit());
        form.username = "operator".to_string();
        let Ok(UserRequest::Update { username, body }) = form.to_request() else {
            panic!("expected update");
        };
        assert_eq!(username, "ops");
        assert_eq!(body.username, "operator");
        assert_eq!(body.password, None);
    }

    #[tokio::test]
    async fn save_and_delete_use_username_paths() {
        let backend = ScriptedBackend::new();
        let shared = backend.shared();
        let update = UserRequest::Update {
            username: "ops team".to_string(),
            body: UserUpdate {
                username: "ops".to_string(),
                password: None,
                disabled: true,
            },
        };
        let _ = save_user(&shared, &update).await;
        let _ = delete_user(&shared, "ops").await;
        let calls = backend.calls();
        assert_eq!(calls[0].method, Method::Put);
        assert_eq!(calls[0].path, "/user/ops%20team");
        assert_eq!(calls[1].method, Method::Delete);
        assert_eq!(calls[1].path, "/user/ops");
    }

    #[test]
    fn list_loads_once_until_refetched() {
        let backend = ScriptedBackend::new();
        backend.ok(paths::USERS, json!([]));
        let resources = UsersResources::new(&backend.shared());
        let scheduler = ManualScheduler::new();
        let session = resources.group(FAILURE_MESSAGE).start(Rc::new(scheduler.clone()));
        scheduler.run_until_stalled();
        scheduler.advance(Duration::from_secs(30));
        scheduler.run_until_stalled();
        assert_eq!(backend.calls().len(), 1);

        session.refetch();
        scheduler.run_until_stalled();
        assert_eq!(backend.calls().len(), 2);
    }
}
