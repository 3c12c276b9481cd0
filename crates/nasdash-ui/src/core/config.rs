//! Runtime constants for talking to the backend.

use std::time::Duration;

/// Default API prefix; the dev server and production proxy both mount the backend here.
pub const DEFAULT_API_BASE: &str = "/api";
/// Interval between poll ticks.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5_000;
/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
/// Route the interceptor sends users to after a rejected credential.
pub const LOGIN_PATH: &str = "/login";

/// Connection and cadence settings shared by every view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL prepended to every endpoint path.
    pub api_base: String,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u32,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u32,
    /// Login route path.
    pub login_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            login_path: LOGIN_PATH.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Override the API base, ignoring blank values.
    #[must_use]
    pub fn with_api_base(mut self, base: Option<&str>) -> Self {
        if let Some(base) = base.map(str::trim).filter(|value| !value.is_empty()) {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.request_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn api_base_override_ignores_blank_and_trailing_slash() {
        let config = DashboardConfig::default().with_api_base(Some("  "));
        assert_eq!(config.api_base, "/api");
        let config = DashboardConfig::default().with_api_base(Some("http://nas:8000/api/"));
        assert_eq!(config.api_base, "http://nas:8000/api");
        let config = DashboardConfig::default().with_api_base(None);
        assert_eq!(config.api_base, "/api");
    }
}
