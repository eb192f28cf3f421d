//! Endpoint handlers.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;

use crate::http::request::{request_id, SearchParams};
use crate::http::response::{SearchResponse, StatusResponse};
use crate::http::server::AppState;
use crate::observability::metrics;

pub const SERVICE_MESSAGE: &str = "Product Search Service running";

/// `GET /`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: SERVICE_MESSAGE.to_string(),
        num_products: state.coordinator.catalog_size(),
        checks_per_search: state.coordinator.sample_size(),
    })
}

/// `GET /products/search?q=<term>&debug=<flag>`
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let query = params.into_query();
    let debug_enabled = query.debug;

    tracing::debug!(
        request_id = %request_id,
        term = %query.term,
        debug = debug_enabled,
        "Search request"
    );

    // Admitted searches run to completion even if the client goes away.
    let coordinator = state.coordinator.clone();
    let task = tokio::spawn(async move { coordinator.search(&query).await });

    let result = task.await;
    metrics::record_breaker(&state.coordinator.breaker().snapshot());

    match result {
        Ok(Ok(outcome)) => {
            tracing::debug!(
                request_id = %request_id,
                total_found = outcome.total_found,
                checked = outcome.checked_request,
                "Search completed"
            );
            metrics::record_search("ok", start);
            SearchResponse::from_outcome(outcome, debug_enabled).into_response()
        }
        Ok(Err(err)) => {
            if err.is_rejection() {
                tracing::info!(request_id = %request_id, reason = err.reason(), "Search rejected");
                metrics::record_rejection(err.reason());
            }
            metrics::record_search(err.reason(), start);
            err.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Search task aborted");
            metrics::record_search("aborted", start);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
