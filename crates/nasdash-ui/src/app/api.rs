//! Context carrying the one HTTP client built at boot.
//!
//! Signing in or out swaps the bearer token inside the client, so pages keep
//! the handle they captured when they mounted.

use crate::core::backend::SharedBackend;
use crate::core::config::DashboardConfig;
use crate::services::api::ApiClient;
use std::rc::Rc;

#[derive(Clone)]
pub(crate) struct ApiCtx {
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    pub(crate) fn new(config: &DashboardConfig) -> Self {
        Self {
            client: Rc::new(ApiClient::new(config)),
        }
    }

    /// The client as the request primitive consumed by feature state.
    pub(crate) fn backend(&self) -> SharedBackend {
        Rc::clone(&self.client) as SharedBackend
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Context client, or a detached default client outside the provider.
#[yew::hook]
pub(crate) fn use_api() -> ApiCtx {
    yew::use_context::<ApiCtx>().unwrap_or_else(|| ApiCtx::new(&DashboardConfig::default()))
}
