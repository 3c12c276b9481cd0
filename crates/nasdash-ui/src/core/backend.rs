//! The HTTP boundary as seen by views: path in, JSON out.
//!
//! # Design
//! - Views depend on `Rc<dyn Backend>`; the browser client implements it with
//!   `gloo-net`, tests implement it with canned responses.
//! - Typed decoding happens here so every feature decodes the same way.

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::ApiError;
use crate::core::poll::FetchFuture;

/// Endpoint paths relative to the API base.
pub mod paths {
    /// Host identity and uptime.
    pub const SYSTEM_STATUS: &str = "/system/status";
    /// CPU utilisation.
    pub const SYSTEM_CPU: &str = "/system/cpu";
    /// RAM and swap.
    pub const SYSTEM_MEMORY: &str = "/system/memory";
    /// Per-mount disk usage.
    pub const SYSTEM_DISK: &str = "/system/disk";
    /// Network counters.
    pub const NETWORK_TRAFFIC: &str = "/network/traffic";
    /// Interface list.
    pub const NETWORK_INTERFACES: &str = "/network/interfaces";
    /// Per-disk I/O.
    pub const IO_DISK: &str = "/io/disk";
    /// Host-wide I/O.
    pub const IO_SYSTEM: &str = "/io/system";
    /// Container list.
    pub const DOCKER_CONTAINERS: &str = "/docker/containers";
    /// Container resource usage.
    pub const DOCKER_STATS: &str = "/docker/stats";
    /// Local images.
    pub const DOCKER_IMAGES: &str = "/docker/images";
    /// Image pull mutation.
    pub const DOCKER_IMAGE_PULL: &str = "/docker/images/pull";
    /// Alarm records.
    pub const ALARM_RECORDS: &str = "/alarm/records";
    /// Alarm rules.
    pub const ALARM_CONFIGS: &str = "/alarm/configs";
    /// Observed client addresses.
    pub const ALARM_ACCESS_IPS: &str = "/alarm/access-ips";
    /// Alarm counters.
    pub const ALARM_STATISTICS: &str = "/alarm/statistics";
    /// User collection.
    pub const USERS: &str = "/user/";
    /// Token endpoint.
    pub const AUTH_LOGIN: &str = "/auth/login";
}

/// HTTP verbs used by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read.
    Get,
    /// Create or trigger.
    Post,
    /// Update.
    Put,
    /// Remove.
    Delete,
}

/// Request primitive consumed by views.
pub trait Backend {
    /// Issue a JSON request; the credential is attached by the implementation.
    fn request(&self, method: Method, path: &str, body: Option<Value>) -> FetchFuture<Value>;
    /// Post `application/x-www-form-urlencoded` fields.
    fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> FetchFuture<Value>;
}

/// Shared handle used by every view.
pub type SharedBackend = Rc<dyn Backend>;

fn decode<T: DeserializeOwned + 'static>(pending: FetchFuture<Value>) -> FetchFuture<T> {
    Box::pin(async move {
        let value = pending.await?;
        serde_json::from_value(value).map_err(ApiError::decode)
    })
}

/// `GET` and decode.
pub fn get<T: DeserializeOwned + 'static>(backend: &SharedBackend, path: &str) -> FetchFuture<T> {
    decode(backend.request(Method::Get, path, None))
}

/// Send a JSON body and decode the response.
pub fn send<T, B>(backend: &SharedBackend, method: Method, path: &str, body: &B) -> FetchFuture<T>
where
    T: DeserializeOwned + 'static,
    B: Serialize + ?Sized,
{
    match serde_json::to_value(body) {
        Ok(body) => decode(backend.request(method, path, Some(body))),
        Err(err) => Box::pin(futures_util::future::ready(Err(ApiError::decode(err)))),
    }
}

/// Body-less request whose response is ignored.
pub fn send_empty(backend: &SharedBackend, method: Method, path: &str) -> FetchFuture<()> {
    let pending = backend.request(method, path, None);
    Box::pin(async move { pending.await.map(|_| ()) })
}

/// Fetch function for a [`crate::core::poll::Resource`] bound to `path`.
pub fn fetcher<T: DeserializeOwned + 'static>(
    backend: &SharedBackend,
    path: &'static str,
) -> impl Fn() -> FetchFuture<T> + 'static {
    let backend = Rc::clone(backend);
    move || get(&backend, path)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned backend for feature tests.

    use super::{Backend, Method, SharedBackend};
    use crate::core::error::ApiError;
    use crate::core::poll::FetchFuture;
    use futures_util::future;
    use serde_json::Value;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Recorded request.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct Call {
        pub method: Method,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Answers every request for a path with the last scripted response.
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        responses: RefCell<HashMap<(Method, String), Result<Value, ApiError>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub(crate) fn respond(&self, method: Method, path: &str, result: Result<Value, ApiError>) {
            self.responses
                .borrow_mut()
                .insert((method, path.to_string()), result);
        }

        pub(crate) fn ok(&self, path: &str, value: Value) {
            self.respond(Method::Get, path, Ok(value));
        }

        pub(crate) fn fail(&self, path: &str, error: ApiError) {
            self.respond(Method::Get, path, Err(error));
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub(crate) fn shared(self: &Rc<Self>) -> SharedBackend {
            Rc::clone(self) as SharedBackend
        }
    }

    impl Backend for ScriptedBackend {
        fn request(&self, method: Method, path: &str, body: Option<Value>) -> FetchFuture<Value> {
            self.calls.borrow_mut().push(Call {
                method,
                path: path.to_string(),
                body,
            });
            let result = self
                .responses
                .borrow()
                .get(&(method, path.to_string()))
                .cloned()
                .unwrap_or(Err(ApiError::Application {
                    status: 404,
                    detail: Some("Not Found".to_string()),
                }));
            Box::pin(future::ready(result))
        }

        fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> FetchFuture<Value> {
            let body = fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), Value::String((*value).to_string())))
                .collect::<serde_json::Map<_, _>>();
            self.request(Method::Post, path, Some(Value::Object(body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use nasdash_api_models::SystemIo;
    use serde_json::json;

    #[tokio::test]
    async fn get_decodes_typed_payload() {
        let backend = ScriptedBackend::new();
        backend.ok(
            paths::IO_SYSTEM,
            json!({
                "total_read_bytes": 1, "total_write_bytes": 2, "total_read_count": 3,
                "total_write_count": 4, "total_read_time": 5, "total_write_time": 6
            }),
        );
        let io: SystemIo = get(&backend.shared(), paths::IO_SYSTEM).await.expect("decode");
        assert_eq!(io.total_write_time, 6);
    }

    #[tokio::test]
    async fn get_reports_shape_mismatch_as_decode_error() {
        let backend = ScriptedBackend::new();
        backend.ok(paths::IO_SYSTEM, json!({"unexpected": true}));
        let err = get::<SystemIo>(&backend.shared(), paths::IO_SYSTEM)
            .await
            .expect_err("mismatch");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn send_serialises_body() {
        let backend = ScriptedBackend::new();
        backend.respond(Method::Post, paths::DOCKER_IMAGE_PULL, Ok(json!({"status": "ok"})));
        let _: Value = send(
            &backend.shared(),
            Method::Post,
            paths::DOCKER_IMAGE_PULL,
            &json!({"image_name": "nginx"}),
        )
        .await
        .expect("pull");
        let calls = backend.calls();
        assert_eq!(calls[0].body, Some(json!({"image_name": "nginx"})));
    }

    #[tokio::test]
    async fn fetcher_issues_one_get_per_call() {
        let backend = ScriptedBackend::new();
        backend.ok(paths::SYSTEM_DISK, json!([]));
        let fetch = fetcher::<Vec<Value>>(&backend.shared(), paths::SYSTEM_DISK);
        fetch().await.expect("first");
        fetch().await.expect("second");
        assert_eq!(backend.calls().len(), 2);
    }
}
