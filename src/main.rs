//! Product search service.
//!
//! A fault-tolerant search endpoint over a synthetic product catalog, built
//! with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                  PRODUCT SEARCH                      │
//!                     │                                                      │
//!   GET /products/    │  ┌────────┐   ┌─────────┐   ┌──────────┐   ┌──────┐  │
//!   search ───────────┼─▶│ http   │──▶│ circuit │──▶│ bulkhead │──▶│ load │  │
//!                     │  │ server │   │ breaker │   │          │   │ shed │  │
//!                     │  └────────┘   └─────────┘   └──────────┘   └──┬───┘  │
//!                     │       ▲                                       │      │
//!                     │       │                                       ▼      │
//!   200 / 503 / 500   │  ┌────┴─────┐   ┌───────────┐   ┌──────────────┐     │
//!   ◀─────────────────┼──│ response │◀──│   fault   │◀──│ query engine │     │
//!                     │  │          │   │ injector  │   │  + catalog   │     │
//!                     │  └──────────┘   └───────────┘   └──────────────┘     │
//!                     │                                                      │
//!                     │  ┌────────────────────────────────────────────────┐  │
//!                     │  │ config · observability · lifecycle             │  │
//!                     │  └────────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use product_search::config::{load_config, validate_config, ServiceConfig};
use product_search::lifecycle::{shutdown_signal, Shutdown};
use product_search::observability::{logging, metrics};
use product_search::HttpServer;

#[derive(Parser)]
#[command(name = "product-search")]
#[command(about = "Fault-tolerant product search service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
    }

    logging::init(&config.observability);
    tracing::info!("product-search v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        num_products = config.catalog.num_products,
        checks_per_search = config.catalog.checks_per_search,
        bulkhead_capacity = config.resilience.bulkhead_capacity,
        max_concurrent = config.resilience.max_concurrent,
        failure_threshold = config.resilience.failure_threshold,
        cooldown_ms = config.resilience.cooldown_ms,
        failure_rate = config.fault.failure_rate,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Catalog is generated before the listener binds.
    let server = HttpServer::new(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
