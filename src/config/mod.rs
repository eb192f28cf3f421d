//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → turned into catalog, engine and resilience policies at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; resilience policies are fixed for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CatalogConfig, FaultConfig, ListenerConfig, ObservabilityConfig, ResilienceConfig,
    ServiceConfig,
};
pub use validation::{validate_config, ValidationError};
