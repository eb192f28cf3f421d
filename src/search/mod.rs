//! Query engine subsystem.
//!
//! # Data Flow
//! ```text
//! Search term
//!     → sampler.rs (pick keys from the catalog key order)
//!     → engine.rs (fetch each record, substring filter, cap output)
//!     → SearchResult (matches, total count, checked count)
//! ```
//!
//! # Design Decisions
//! - Statistical sample, not exhaustive search: random keys with replacement
//! - Sequential sampling exists for deterministic, exhaustive test runs
//! - The engine itself never fails; faults are layered on by the coordinator

pub mod engine;
pub mod sampler;

pub use engine::{QueryEngine, SearchResult};
pub use sampler::{KeySampler, RandomSampler, SamplingMode, SequentialSampler};
