//! Responses served by endpoint modules.
//!
//! # Responsibilities
//! - Turn an endpoint document into a fixed HTTP response at bind time
//! - Reject documents whose status or headers are not valid HTTP
//!
//! # Document Fields
//! ```text
//! status        u16, default 200
//! headers       table of string → string
//! json          any value, served as application/json
//! body          string, served as text/plain unless content_type is set
//! content_type  string
//! ```
//!
//! # Design Decisions
//! - Validation happens once, when the route is bound, not per request
//! - `json` wins over `body` when both are present

use std::path::Path;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::error::{LoaderError, LoaderResult};
use crate::module::Endpoint;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// A pre-built response served for every request to a route.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl EndpointResponse {
    /// Build the response described by `endpoint`, loaded from `source`.
    pub fn from_endpoint(endpoint: &Endpoint, source: &Path) -> LoaderResult<Self> {
        let malformed = |reason: String| LoaderError::malformed(source, reason);

        let status = match endpoint.get("status") {
            None => StatusCode::OK,
            Some(value) => value
                .as_u64()
                .and_then(|code| u16::try_from(code).ok())
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| malformed(format!("invalid status {}", value)))?,
        };

        let mut headers = HeaderMap::new();
        let (body, content_type) = match (endpoint.get("json"), endpoint.get("body")) {
            (Some(json), _) => {
                let bytes = serde_json::to_vec(json).map_err(|e| malformed(e.to_string()))?;
                (Bytes::from(bytes), Some(JSON))
            }
            (None, Some(Value::String(text))) => (Bytes::from(text.clone()), Some(TEXT)),
            (None, Some(other)) => return Err(malformed(format!("`body` must be a string, found {}", other))),
            (None, None) => (Bytes::new(), None),
        };

        let content_type = match endpoint.get("content_type") {
            Some(Value::String(ct)) => Some(ct.as_str()),
            Some(other) => return Err(malformed(format!("`content_type` must be a string, found {}", other))),
            None => content_type,
        };
        if let Some(ct) = content_type {
            let value = HeaderValue::from_str(ct).map_err(|e| malformed(e.to_string()))?;
            headers.insert(header::CONTENT_TYPE, value);
        }

        match endpoint.get("headers") {
            None => {}
            Some(Value::Object(map)) => {
                for (name, value) in map {
                    let Value::String(value) = value else {
                        return Err(malformed(format!("header `{}` must be a string", name)));
                    };
                    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| malformed(e.to_string()))?;
                    let value = HeaderValue::from_str(value).map_err(|e| malformed(e.to_string()))?;
                    headers.insert(name, value);
                }
            }
            Some(_) => return Err(malformed("`headers` must be a table".into())),
        }

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for EndpointResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
