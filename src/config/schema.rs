//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::resilience::{CircuitBreakerConfig, CostedWork, FaultInjector};
use crate::search::SamplingMode;

/// Root configuration for the search service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Catalog size and per-request search limits.
    pub catalog: CatalogConfig,

    /// Bulkhead, load shedding and circuit breaker policy.
    pub resilience: ResilienceConfig,

    /// Simulated backend failures.
    pub fault: FaultConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Number of synthetic products generated at startup.
    pub num_products: usize,

    /// Keys sampled per search request.
    pub checks_per_search: usize,

    /// Maximum products returned in one response.
    pub max_results: usize,

    /// How keys are sampled.
    pub sampling: SamplingMode,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            num_products: 100_000,
            checks_per_search: 100,
            max_results: 20,
            sampling: SamplingMode::Random,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Concurrent searches admitted by the bulkhead.
    pub bulkhead_capacity: usize,

    /// In-flight ceiling checked after bulkhead admission.
    pub max_concurrent: usize,

    /// Consecutive failures that open the circuit.
    pub failure_threshold: u64,

    /// Open-circuit cooldown in milliseconds.
    pub cooldown_ms: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            bulkhead_capacity: 50,
            max_concurrent: 50,
            failure_threshold: 100,
            cooldown_ms: 5_000,
        }
    }
}

impl ResilienceConfig {
    pub fn breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.failure_threshold,
            cooldown: Duration::from_millis(self.cooldown_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Fraction of successful searches turned into failures (0.0..=1.0).
    pub failure_rate: f32,

    /// Busy-loop iterations burned per failure.
    pub busy_iterations: u64,

    /// Shared lock hold per failure in milliseconds.
    pub lock_hold_ms: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.2,
            busy_iterations: 30_000_000,
            lock_hold_ms: 50,
        }
    }
}

impl FaultConfig {
    pub fn injector(&self) -> FaultInjector {
        let work = CostedWork {
            iterations: self.busy_iterations,
            hold: Duration::from_millis(self.lock_hold_ms),
        };
        FaultInjector::new(self.failure_rate, Arc::new(work))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
