//! Response bodies and error mapping.
//!
//! # Design Decisions
//! - Success bodies are JSON; rejections and failures are plain-text reasons
//! - 503 means "back off", 500 means "this attempt's work was wasted"
//! - Debug counters are omitted entirely unless requested

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::Record;
use crate::coordinator::{SearchError, SearchOutcome};

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub num_products: usize,
    pub checks_per_search: usize,
}

/// Body of a successful `GET /products/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<Record>,
    pub total_found: usize,
    pub search_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_request: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_checked: Option<u64>,
}

impl SearchResponse {
    pub fn from_outcome(outcome: SearchOutcome, debug: bool) -> Self {
        Self {
            products: outcome.products,
            total_found: outcome.total_found,
            search_time: format!("{:.4}s", outcome.elapsed.as_secs_f64()),
            checked_request: debug.then_some(outcome.checked_request),
            total_checked: debug.then_some(outcome.total_checked),
        }
    }
}

impl IntoResponse for SearchResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::CircuitOpen | SearchError::BulkheadFull | SearchError::Overloaded => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SearchError::InjectedFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
