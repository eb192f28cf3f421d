//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the status and search handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on a bound listener until shutdown

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::catalog;
use crate::config::ServiceConfig;
use crate::coordinator::SearchCoordinator;
use crate::http::handlers;
use crate::http::request::UuidRequestId;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub coordinator: Arc<SearchCoordinator>,
}

/// HTTP server for the search service.
pub struct HttpServer {
    router: Router,
    coordinator: Arc<SearchCoordinator>,
}

impl HttpServer {
    /// Generate the catalog and build the full service from configuration.
    pub fn new(config: &ServiceConfig) -> Self {
        let catalog = Arc::new(catalog::generate(config.catalog.num_products));
        let coordinator = SearchCoordinator::from_config(config, catalog);
        Self::with_coordinator(Arc::new(coordinator))
    }

    pub fn with_coordinator(coordinator: Arc<SearchCoordinator>) -> Self {
        let state = AppState {
            coordinator: coordinator.clone(),
        };
        Self {
            router: Self::build_router(state),
            coordinator,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::status))
            .route("/products/search", get(handlers::search))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a shutdown message arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            catalog_size = self.coordinator.catalog_size(),
            bulkhead_capacity = self.coordinator.bulkhead().capacity(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
