//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint on its own address
//! ```
//!
//! # Design Decisions
//! - Request ID is attached by the HTTP layer and logged with every outcome
//! - Metric updates are cheap; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
