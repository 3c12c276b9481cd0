//! HTTP client for the NAS backend (REST).
//!
//! # Design
//! - One client per app boot; the credential is swapped in place on login and
//!   logout so views never rebuild their resources.
//! - Every request is bounded by the configured timeout and aborted through an
//!   `AbortController` when it expires.
//! - A 401 on an authenticated request invokes the unauthorized handler once
//!   per response; the app clears the credential and routes to login.

use std::cell::RefCell;
use std::rc::Rc;

use futures_util::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use tracing::{debug, warn};
use web_sys::AbortController;

use crate::core::auth::Credential;
use crate::core::backend::{Backend, Method};
use crate::core::config::DashboardConfig;
use crate::core::error::ApiError;
use crate::core::http::{classify_response, decode_json, encode_form, join_url};
use crate::core::poll::FetchFuture;

type UnauthorizedHandler = Rc<dyn Fn()>;

struct ClientState {
    base_url: String,
    timeout_ms: u32,
    credential: RefCell<Option<Credential>>,
    on_unauthorized: RefCell<Option<UnauthorizedHandler>>,
}

enum Payload {
    Empty,
    Json(Value),
    Form(String),
}

/// Shared REST client.
#[derive(Clone)]
pub(crate) struct ApiClient {
    state: Rc<ClientState>,
}

impl ApiClient {
    pub(crate) fn new(config: &DashboardConfig) -> Self {
        Self {
            state: Rc::new(ClientState {
                base_url: config.api_base.clone(),
                timeout_ms: config.request_timeout_ms,
                credential: RefCell::new(None),
                on_unauthorized: RefCell::new(None),
            }),
        }
    }

    /// Replace the credential attached to subsequent requests.
    pub(crate) fn set_credential(&self, credential: Option<Credential>) {
        *self.state.credential.borrow_mut() = credential;
    }

    /// Install the handler run when the backend rejects the credential.
    pub(crate) fn on_unauthorized(&self, handler: impl Fn() + 'static) {
        *self.state.on_unauthorized.borrow_mut() = Some(Rc::new(handler));
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let value = self.execute(Method::Get, path, Payload::Empty).await?;
        serde_json::from_value(value).map_err(ApiError::decode)
    }

    pub(crate) async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(Method::Post, path, Payload::Json(body)).await
    }

    pub(crate) async fn put_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(Method::Put, path, Payload::Json(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, Payload::Empty)
            .await
            .map(|_| ())
    }

    pub(crate) async fn submit_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        self.execute(Method::Post, path, Payload::Form(encode_form(fields)))
            .await
    }

    fn build(&self, method: Method, url: &str, payload: Payload) -> Result<Request, ApiError> {
        let mut request = match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        };
        if let Some(credential) = self.state.credential.borrow().as_ref() {
            request = request.header("Authorization", &credential.bearer());
        }
        match payload {
            Payload::Empty => Ok(request),
            Payload::Json(body) => request.json(&body).map_err(ApiError::transport),
            Payload::Form(body) => Ok(request
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body)),
        }
    }

    async fn execute(&self, method: Method, path: &str, payload: Payload) -> Result<Value, ApiError> {
        let url = join_url(&self.state.base_url, path);
        let authenticated = self.state.credential.borrow().is_some();
        let controller = AbortController::new().ok();
        let request = self
            .build(method, &url, payload)?
            .abort_signal(controller.as_ref().map(|controller| controller.signal()).as_ref());

        debug!(?method, %url, "request");
        let response = match select(
            Box::pin(request.send()),
            Box::pin(TimeoutFuture::new(self.state.timeout_ms)),
        )
        .await
        {
            Either::Left((result, _)) => result.map_err(ApiError::transport)?,
            Either::Right(((), _)) => {
                if let Some(controller) = controller {
                    controller.abort();
                }
                warn!(%url, after_ms = self.state.timeout_ms, "request timed out");
                return Err(ApiError::Timeout {
                    after_ms: self.state.timeout_ms,
                });
            }
        };
        self.finish(&url, authenticated, response).await
    }

    async fn finish(
        &self,
        url: &str,
        authenticated: bool,
        response: Response,
    ) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        if let Err(err) = classify_response(status, &body) {
            if err.is_unauthorized() && authenticated {
                warn!(%url, "credential rejected");
                let handler = self.state.on_unauthorized.borrow().clone();
                if let Some(handler) = handler {
                    handler();
                }
            }
            return Err(err);
        }
        decode_json(&body)
    }
}

impl Backend for ApiClient {
    fn request(&self, method: Method, path: &str, body: Option<Value>) -> FetchFuture<Value> {
        let client = self.clone();
        let path = path.to_string();
        Box::pin(async move {
            match (method, body) {
                (Method::Get, _) => client.get_json(&path).await,
                (Method::Post, body) => client.post_json(&path, body.unwrap_or(Value::Null)).await,
                (Method::Put, body) => client.put_json(&path, body.unwrap_or(Value::Null)).await,
                (Method::Delete, _) => client.delete(&path).await.map(|()| Value::Null),
            }
        })
    }

    fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> FetchFuture<Value> {
        let client = self.clone();
        let path = path.to_string();
        let owned: Vec<(String, String)> = fields
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Box::pin(async move {
            let borrowed: Vec<(&str, &str)> = owned
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            client.submit_form(&path, &borrowed).await
        })
    }
}
