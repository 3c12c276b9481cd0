//! State of a user-triggered mutation (image pull, alarm update, user CRUD).
//!
//! Mutation errors render next to the control that triggered them and are
//! kept apart from the view's polling error.

use crate::core::error::ApiError;

/// Progress of one mutation control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionState {
    /// Nothing submitted.
    #[default]
    Idle,
    /// Request in flight.
    Busy,
    /// Last request succeeded.
    Succeeded,
    /// Last request failed with a display message.
    Failed(String),
}

impl ActionState {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Failure message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enter `Busy`; returns `false` if a request is already running.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        *self = Self::Busy;
        true
    }

    /// Record the outcome. Credential failures reset to `Idle` because the
    /// interceptor already redirected to login.
    pub fn finish<T>(&mut self, result: &Result<T, ApiError>, fallback: &str) {
        *self = match result {
            Ok(_) => Self::Succeeded,
            Err(err) if err.is_unauthorized() => Self::Idle,
            Err(err) => Self::Failed(err.detail_or(fallback)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PULL_FAILED: &str = "拉取镜像失败，请检查镜像名称是否正确";

    #[test]
    fn begin_rejects_double_submit() {
        let mut state = ActionState::default();
        assert!(state.begin());
        assert!(!state.begin());
        assert!(state.is_busy());
    }

    #[test]
    fn finish_maps_outcomes() {
        let mut state = ActionState::Busy;
        state.finish::<()>(&Ok(()), PULL_FAILED);
        assert_eq!(state, ActionState::Succeeded);

        state.finish::<()>(
            &Err(ApiError::Application {
                status: 404,
                detail: Some("pull access denied".to_string()),
            }),
            PULL_FAILED,
        );
        assert_eq!(state.error(), Some("pull access denied"));

        state.finish::<()>(&Err(ApiError::transport("offline")), PULL_FAILED);
        assert_eq!(state.error(), Some(PULL_FAILED));

        state.finish::<()>(&Err(ApiError::Unauthorized), PULL_FAILED);
        assert_eq!(state, ActionState::Idle);
    }
}
