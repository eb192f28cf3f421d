//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, query parameters)
//!     → handlers.rs (status / search)
//!     → coordinator (admission pipeline)
//!     → response.rs (JSON body or status + plain-text reason)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{SearchParams, UuidRequestId, X_REQUEST_ID};
pub use response::{SearchResponse, StatusResponse};
pub use server::{AppState, HttpServer};
