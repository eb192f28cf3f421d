//! Request coordination for the search endpoint.
//!
//! # Data Flow
//! ```text
//! SearchQuery
//!     → CircuitBreaker::admit        (reject: CircuitOpen)
//!     → Bulkhead::try_acquire        (reject: BulkheadFull)
//!     → ConcurrencyGauge::enter      (reject: Overloaded)
//!     → QueryEngine::search
//!     → FaultInjector::apply         (fail: breaker failure, then InjectedFailure)
//!     → breaker success, running total, SearchOutcome
//! ```
//!
//! # Design Decisions
//! - Each step short-circuits; admission rejections do no downstream work
//! - The gauge guard and bulkhead permit are scoped locals, released on every return
//! - Only injected failures reach the breaker; rejections never do
//! - A fault counts against the breaker when decided, before its simulated cost
//! - No retries and no fallback result

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{CatalogStore, Record};
use crate::config::ServiceConfig;
use crate::resilience::{Bulkhead, CircuitBreaker, ConcurrencyGauge, FaultInjector};
use crate::search::QueryEngine;

/// Why a search did not produce results. `Display` is the wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Circuit Open")]
    CircuitOpen,

    #[error("Request overload")]
    BulkheadFull,

    #[error("Server overloaded, try again later")]
    Overloaded,

    #[error("Overload failure simulation")]
    InjectedFailure,
}

impl SearchError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            SearchError::CircuitOpen => "circuit_open",
            SearchError::BulkheadFull => "bulkhead_full",
            SearchError::Overloaded => "overloaded",
            SearchError::InjectedFailure => "injected_failure",
        }
    }

    /// True for cheap admission rejections, false for wasted-work failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, SearchError::InjectedFailure)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub debug: bool,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            debug: false,
        }
    }
}

/// Result of an admitted, successful search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub products: Vec<Record>,
    pub total_found: usize,
    pub elapsed: Duration,
    /// Keys sampled by this request.
    pub checked_request: usize,
    /// Keys sampled by all successful requests so far, this one included.
    pub total_checked: u64,
}

/// Per-request search limits.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub sample_size: usize,
    pub max_results: usize,
}

/// Owns the engine and every resilience primitive guarding it.
#[derive(Debug)]
pub struct SearchCoordinator {
    engine: QueryEngine,
    breaker: CircuitBreaker,
    bulkhead: Bulkhead,
    gauge: ConcurrencyGauge,
    faults: FaultInjector,
    limits: SearchLimits,
    total_checked: AtomicU64,
}

impl SearchCoordinator {
    pub fn new(
        engine: QueryEngine,
        breaker: CircuitBreaker,
        bulkhead: Bulkhead,
        gauge: ConcurrencyGauge,
        faults: FaultInjector,
        limits: SearchLimits,
    ) -> Self {
        Self {
            engine,
            breaker,
            bulkhead,
            gauge,
            faults,
            limits,
            total_checked: AtomicU64::new(0),
        }
    }

    /// Wire up a coordinator from configuration over an existing catalog.
    pub fn from_config(config: &ServiceConfig, catalog: Arc<CatalogStore>) -> Self {
        let engine = QueryEngine::with_sampler(catalog, config.catalog.sampling.sampler());
        Self::new(
            engine,
            CircuitBreaker::new(config.resilience.breaker()),
            Bulkhead::new(config.resilience.bulkhead_capacity),
            ConcurrencyGauge::new(config.resilience.max_concurrent),
            config.fault.injector(),
            SearchLimits {
                sample_size: config.catalog.checks_per_search,
                max_results: config.catalog.max_results,
            },
        )
    }

    /// Replace the fault injector.
    pub fn with_fault_injector(mut self, faults: FaultInjector) -> Self {
        self.faults = faults;
        self
    }

    /// Run one search through the admission pipeline.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        if !self.breaker.admit() {
            return Err(SearchError::CircuitOpen);
        }

        let Some(_permit) = self.bulkhead.try_acquire() else {
            return Err(SearchError::BulkheadFull);
        };

        let in_flight = self.gauge.enter();
        if in_flight.exceeds_ceiling() {
            tracing::debug!(
                in_flight = in_flight.level(),
                ceiling = self.gauge.ceiling(),
                "Shedding load"
            );
            return Err(SearchError::Overloaded);
        }

        let start = Instant::now();
        let result = self.engine.search(
            &query.term,
            self.limits.sample_size,
            self.limits.max_results,
        );

        let faulted = self
            .faults
            .apply(result, || self.breaker.record_failure())
            .await;
        let result = match faulted {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(term = %query.term, "Product search failed");
                return Err(SearchError::InjectedFailure);
            }
        };

        self.breaker.record_success();
        let checked = result.checked as u64;
        let total_checked = self.total_checked.fetch_add(checked, Ordering::Relaxed) + checked;

        Ok(SearchOutcome {
            products: result.matches,
            total_found: result.total_matches,
            elapsed: start.elapsed(),
            checked_request: result.checked,
            total_checked,
        })
    }

    pub fn catalog_size(&self) -> usize {
        self.engine.catalog().len()
    }

    pub fn sample_size(&self) -> usize {
        self.limits.sample_size
    }

    pub fn in_flight(&self) -> usize {
        self.gauge.current()
    }

    pub fn total_checked(&self) -> u64 {
        self.total_checked.load(Ordering::Relaxed)
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn bulkhead(&self) -> &Bulkhead {
        &self.bulkhead
    }
}
