//! Typed failures for requests issued by the dashboard.
//!
//! # Design
//! - One enum covers every way a request can fail so polling code can treat
//!   transport, credential, and backend failures uniformly.
//! - Authentication failures are distinct so the global interceptor can own them.

use thiserror::Error;

/// Failure of a single backend request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained (offline, DNS, connection refused).
    #[error("network request failed: {message}")]
    Transport {
        /// Description from the transport layer.
        message: String,
    },
    /// The request exceeded the client timeout.
    #[error("request timed out after {after_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        after_ms: u32,
    },
    /// The credential was rejected (HTTP 401).
    #[error("credential rejected")]
    Unauthorized,
    /// Non-success status with an optional backend message.
    #[error("request failed with status {status}")]
    Application {
        /// HTTP status code.
        status: u16,
        /// Backend `detail` message when one was returned.
        detail: Option<String>,
    },
    /// A success response whose body did not match the expected shape.
    #[error("unexpected response payload: {message}")]
    Decode {
        /// Decoder error text.
        message: String,
    },
}

/// Coarse classification used by views and the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response.
    Transport,
    /// Credential missing or expired.
    Authentication,
    /// Backend answered with an error.
    Application,
}

impl ApiError {
    /// Build a transport error from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: cause.to_string(),
        }
    }

    /// Build a decode error from any displayable cause.
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: cause.to_string(),
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Application { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. } => None,
        }
    }

    /// Human-readable backend message, when one was returned.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether the global interceptor handles this error.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Classification for display and routing decisions.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Unauthorized => ErrorKind::Authentication,
            Self::Application { .. } | Self::Decode { .. } => ErrorKind::Application,
        }
    }

    /// Backend detail when present, otherwise the supplied fallback.
    #[must_use]
    pub fn detail_or(&self, fallback: &str) -> String {
        self.detail().map_or_else(|| fallback.to_string(), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_response_presence() {
        assert_eq!(ApiError::transport("offline").status(), None);
        assert_eq!(ApiError::Timeout { after_ms: 10_000 }.status(), None);
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        let app = ApiError::Application {
            status: 422,
            detail: Some("bad image".to_string()),
        };
        assert_eq!(app.status(), Some(422));
        assert_eq!(app.detail(), Some("bad image"));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(ApiError::transport("x").kind(), ErrorKind::Transport);
        assert_eq!(
            ApiError::Timeout { after_ms: 1 }.kind(),
            ErrorKind::Transport
        );
        assert_eq!(ApiError::Unauthorized.kind(), ErrorKind::Authentication);
        assert_eq!(ApiError::decode("eof").kind(), ErrorKind::Application);
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::decode("eof").is_unauthorized());
    }

    #[test]
    fn detail_or_prefers_backend_message() {
        let fallback = "拉取镜像失败，请检查镜像名称是否正确";
        let with_detail = ApiError::Application {
            status: 404,
            detail: Some("image not found".to_string()),
        };
        let without = ApiError::Application {
            status: 500,
            detail: None,
        };
        assert_eq!(with_detail.detail_or(fallback), "image not found");
        assert_eq!(without.detail_or(fallback), fallback);
        assert_eq!(ApiError::transport("down").detail_or(fallback), fallback);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(
            ApiError::Timeout { after_ms: 10_000 }.to_string(),
            "request timed out after 10000 ms"
        );
        assert_eq!(
            ApiError::Application {
                status: 500,
                detail: None
            }
            .to_string(),
            "request failed with status 500"
        );
    }
}
