//! Circuit breaker guarding the search path.
//!
//! # States
//! - Closed: requests pass through, failures counted
//! - Open: requests fail fast without touching the engine
//!
//! # State Transitions
//! ```text
//! Closed → Open:   failure_count >= threshold (any success resets the count)
//! Open → Closed:   first admit() once cooldown has elapsed since the last
//!                  failure; that request is let through as normal traffic
//! ```
//!
//! # Design Decisions
//! - No separate Half-Open phase with limited trial traffic
//! - The reset is lazy: evaluated inside `admit()`, never by a timer
//! - Rejections while open do not touch the count or the failure timestamp
//! - All state sits behind one mutex so admit's check-and-reset is atomic

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Breaker policy.
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    /// Failures (without an intervening success) that open the circuit.
    pub failure_threshold: u64,
    /// Time since the last failure before an open circuit admits again.
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 100,
            cooldown: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
}

/// Point-in-time view of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircuitSnapshot {
    pub state: CircuitState,
    pub failure_count: u64,
}

#[derive(Debug, Default)]
struct BreakerState {
    failures: u64,
    last_failure: Option<Instant>,
    open: bool,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// Decide whether a request may proceed. Call exactly once per request.
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    /// `admit` evaluated against an explicit clock reading.
    pub fn admit_at(&self, now: Instant) -> bool {
        let mut state = self.lock();
        if !state.open {
            return true;
        }

        let cooling = state
            .last_failure
            .is_some_and(|at| now.saturating_duration_since(at) < self.config.cooldown);
        if cooling {
            return false;
        }

        state.open = false;
        state.failures = 0;
        drop(state);

        tracing::info!("Circuit breaker closed after cooldown");
        metrics::record_circuit_open(false);
        true
    }

    /// Count a failed operation and open the circuit at the threshold.
    pub fn record_failure(&self) {
        self.record_failure_at(Instant::now());
    }

    pub fn record_failure_at(&self, now: Instant) {
        let mut state = self.lock();
        state.failures += 1;
        state.last_failure = Some(now);

        if state.failures >= self.config.failure_threshold && !state.open {
            state.open = true;
            let failures = state.failures;
            drop(state);

            tracing::warn!(
                failures,
                cooldown_ms = self.config.cooldown.as_millis() as u64,
                "Circuit breaker opened"
            );
            metrics::record_circuit_open(true);
        }
    }

    /// Clear the failure count. An open circuit stays open until cooldown.
    pub fn record_success(&self) {
        self.lock().failures = 0;
    }

    pub fn failure_count(&self) -> u64 {
        self.lock().failures
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let state = self.lock();
        CircuitSnapshot {
            state: if state.open {
                CircuitState::Open
            } else {
                CircuitState::Closed
            },
            failure_count: state.failures,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u64, cooldown_ms: u64) -> CircuitBreaker {
        CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: threshold,
            cooldown: Duration::from_millis(cooldown_ms),
        })
    }

    #[test]
    fn test_opens_at_threshold() {
        let cb = breaker(3, 1000);
        let t0 = Instant::now();

        cb.record_failure_at(t0);
        cb.record_failure_at(t0);
        assert!(cb.admit_at(t0));
        assert!(!cb.is_open());

        cb.record_failure_at(t0);
        assert!(cb.is_open());
        assert!(!cb.admit_at(t0));
        assert!(!cb.admit_at(t0 + Duration::from_millis(999)));
    }

    #[test]
    fn test_reopens_traffic_after_cooldown() {
        let cb = breaker(2, 500);
        let t0 = Instant::now();
        cb.record_failure_at(t0);
        cb.record_failure_at(t0);

        assert!(!cb.admit_at(t0 + Duration::from_millis(100)));
        assert!(cb.admit_at(t0 + Duration::from_millis(500)));
        assert_eq!(
            cb.snapshot(),
            CircuitSnapshot {
                state: CircuitState::Closed,
                failure_count: 0
            }
        );

        // Fresh closed state: one more failure is below threshold.
        cb.record_failure_at(t0 + Duration::from_millis(600));
        assert!(cb.admit_at(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_rejections_do_not_extend_cooldown() {
        let cb = breaker(1, 200);
        let t0 = Instant::now();
        cb.record_failure_at(t0);

        for ms in [10, 50, 150, 199] {
            assert!(!cb.admit_at(t0 + Duration::from_millis(ms)));
        }
        assert_eq!(cb.failure_count(), 1);
        assert!(cb.admit_at(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_success_resets_count() {
        let cb = breaker(3, 1000);
        let t0 = Instant::now();

        cb.record_failure_at(t0);
        cb.record_failure_at(t0);
        cb.record_success();
        assert_eq!(cb.failure_count(), 0);

        cb.record_failure_at(t0);
        cb.record_failure_at(t0);
        assert!(!cb.is_open());
        assert!(cb.admit_at(t0));
    }

    #[test]
    fn test_success_does_not_close_open_circuit() {
        let cb = breaker(1, 1000);
        let t0 = Instant::now();
        cb.record_failure_at(t0);
        cb.record_success();

        assert!(cb.is_open());
        assert!(!cb.admit_at(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn test_late_failure_restarts_cooldown() {
        // Requests admitted before the circuit opened may still fail afterwards.
        let cb = breaker(1, 100);
        let t0 = Instant::now();
        cb.record_failure_at(t0);
        cb.record_failure_at(t0 + Duration::from_millis(80));

        assert!(!cb.admit_at(t0 + Duration::from_millis(120)));
        assert!(cb.admit_at(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn test_concurrent_failures_are_all_counted() {
        let cb = std::sync::Arc::new(breaker(10_000, 1000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cb = cb.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        cb.record_failure();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cb.failure_count(), 4000);
    }
}
