//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Search request:
//!     → circuit_breaker.rs (reject while open and cooling down)
//!     → bulkhead.rs (non-blocking slot acquisition)
//!     → load_shed.rs (in-flight gauge against a second ceiling)
//!     → query engine
//!     → fault.rs (probabilistic failure with CPU burn + shared lock hold)
//!     → circuit_breaker.rs (record failure / success)
//! ```
//!
//! # Design Decisions
//! - Every primitive is an explicit object; nothing lives in globals
//! - Slot and gauge release are tied to `Drop` so every exit path releases
//! - Rejections are cheap and never count as breaker failures
//! - Policies are fixed at startup from configuration

pub mod bulkhead;
pub mod circuit_breaker;
pub mod fault;
pub mod load_shed;

pub use bulkhead::{Bulkhead, BulkheadPermit};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitSnapshot, CircuitState};
pub use fault::{CostedWork, FaultInjector, InjectedFault, NoWork, WorkSimulator};
pub use load_shed::{ConcurrencyGauge, InFlightGuard};
