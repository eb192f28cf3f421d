//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use product_search::catalog::{CatalogStore, Record};
use product_search::resilience::WorkSimulator;
use product_search::{HttpServer, SearchCoordinator, ServiceConfig, Shutdown};

/// Small, failure-free config suitable for tests.
#[allow(dead_code)]
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.catalog.num_products = 1_000;
    config.fault.failure_rate = 0.0;
    config.observability.metrics_enabled = false;
    config
}

#[allow(dead_code)]
pub fn record(id: u64, brand: &str, category: &str) -> Record {
    Record {
        id,
        name: format!("Product {} {}", brand, id),
        category: category.into(),
        description: format!("Product Description {}", id),
        brand: brand.into(),
    }
}

/// Five records with brand "Alpha" at keys 0 and 5.
#[allow(dead_code)]
pub fn alpha_catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::from_records(vec![
        record(0, "Alpha", "Electronics"),
        record(1, "Beta", "Books"),
        record(2, "Gamma", "Home"),
        record(3, "Delta", "Outdoors"),
        record(5, "Alpha", "Electronics"),
    ]))
}

/// Start a server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub async fn start_coordinator(coordinator: SearchCoordinator) -> (SocketAddr, Shutdown) {
    start_server(HttpServer::with_coordinator(Arc::new(coordinator))).await
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Work simulator that blocks faulted requests until released.
#[derive(Debug, Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

#[allow(dead_code)]
impl Gate {
    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }
}

impl WorkSimulator for Gate {
    fn burn(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
    }

    fn hold(&self) -> Duration {
        Duration::ZERO
    }
}
