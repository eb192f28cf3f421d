//! Product search service with bulkhead, circuit breaker and load shedding.

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod search;

pub use config::ServiceConfig;
pub use coordinator::{SearchCoordinator, SearchError, SearchOutcome, SearchQuery};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
