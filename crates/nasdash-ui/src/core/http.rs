//! Transport-agnostic request/response helpers.
//!
//! # Design
//! - Keep URL building, header values, and status classification DOM-free so
//!   they are tested natively; the wasm client only moves bytes.

use crate::core::error::ApiError;
use nasdash_api_models::ErrorBody;
use serde::de::DeserializeOwned;

/// Join the API base and an endpoint path with exactly one slash.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// `Authorization` header value for a bearer token.
#[must_use]
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Percent-encode a value used as one path segment.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encode key/value pairs as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Map a response status and body to success or a typed failure.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for 401 and [`ApiError::Application`]
/// (with the parsed backend `detail`) for any other non-2xx status.
pub fn classify_response(status: u16, body: &str) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        _ => Err(ApiError::Application {
            status,
            detail: parse_detail(body),
        }),
    }
}

/// Extract the backend `detail` message from an error body.
#[must_use]
pub fn parse_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message())
}

/// Decode a success body; an empty body decodes as JSON `null`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body does not match `T`.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nasdash_api_models::CpuUsage;

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("/api", "/system/cpu"), "/api/system/cpu");
        assert_eq!(join_url("/api/", "system/cpu"), "/api/system/cpu");
        assert_eq!(join_url("http://nas/api", "/user/"), "http://nas/api/user/");
        assert_eq!(join_url("/api", ""), "/api");
    }

    #[test]
    fn bearer_header_formats_token() {
        assert_eq!(bearer_header("abc"), "Bearer abc");
    }

    #[test]
    fn form_and_segments_are_encoded() {
        assert_eq!(
            encode_form(&[("username", "admin"), ("password", "p@ss word")]),
            "username=admin&password=p%40ss%20word"
        );
        assert_eq!(encode_segment("fe80::1"), "fe80%3A%3A1");
    }

    #[test]
    fn classify_maps_statuses() {
        assert_eq!(classify_response(200, ""), Ok(()));
        assert_eq!(classify_response(204, ""), Ok(()));
        assert_eq!(classify_response(401, "{}"), Err(ApiError::Unauthorized));
        assert_eq!(
            classify_response(400, r#"{"detail":"镜像名称无效"}"#),
            Err(ApiError::Application {
                status: 400,
                detail: Some("镜像名称无效".to_string())
            })
        );
        assert_eq!(
            classify_response(502, "<html>bad gateway</html>"),
            Err(ApiError::Application {
                status: 502,
                detail: None
            })
        );
    }

    #[test]
    fn classify_flattens_validation_errors() {
        let body = r#"{"detail":[{"loc":["body","username"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(
            classify_response(422, body).err().and_then(|err| err.detail().map(str::to_string)),
            Some("username: field required".to_string())
        );
    }

    #[test]
    fn decode_json_reports_shape_mismatch() {
        let ok: CpuUsage = decode_json(
            r#"{"total_usage":12.5,"per_core_usage":[10.0,15.0],"cpu_count":{"physical":1,"logical":2}}"#,
        )
        .expect("decode");
        assert!((ok.total_usage - 12.5).abs() < f64::EPSILON);
        let err = decode_json::<CpuUsage>(r#"{"total":1}"#).expect_err("mismatch");
        assert!(matches!(err, ApiError::Decode { .. }));
        let empty: serde_json::Value = decode_json("").expect("empty");
        assert!(empty.is_null());
    }
}
