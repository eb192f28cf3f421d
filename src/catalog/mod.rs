//! Product catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     generator.rs (synthesize N records)
//!     → store.rs (keyed map + ordered key list)
//!     → shared via Arc with the query engine
//!
//! Per request:
//!     query engine samples keys
//!     → store.rs point lookups (read-only)
//! ```
//!
//! # Design Decisions
//! - Populated once before the listener binds; no writes afterwards
//! - Records are immutable values; lookups hand out clones
//! - Key order is fixed at build time so sampling is uniform over it

pub mod generator;
pub mod record;
pub mod store;

pub use generator::{generate, BRANDS, CATEGORIES};
pub use record::Record;
pub use store::CatalogStore;
