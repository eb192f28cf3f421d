//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the client sent one
//! - Parse search query parameters
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Unknown or malformed `debug` values mean "off"

use axum::http::{HeaderMap, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::coordinator::SearchQuery;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID from headers, for logging.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Query string of `/products/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub debug: Option<String>,
}

impl SearchParams {
    /// `debug=1` or `debug=true` (any case).
    pub fn debug_enabled(&self) -> bool {
        self.debug
            .as_deref()
            .map(|d| d == "1" || d.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn into_query(self) -> SearchQuery {
        let debug = self.debug_enabled();
        SearchQuery {
            term: self.q.unwrap_or_default(),
            debug,
        }
    }
}
