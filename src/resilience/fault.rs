//! Fault injection for the search path.
//!
//! # Responsibilities
//! - Decide per request whether an otherwise good result is discarded
//! - On a fault, notify the caller, then burn CPU and hold the shared
//!   degradation lock
//!
//! # Design Decisions
//! - The decision is a closure so tests can make it deterministic
//! - Simulated cost is a `WorkSimulator`: costed in production, free in tests
//! - CPU burn runs on the blocking pool and is not cancellable
//! - The lock is a Tokio mutex; faulted requests queue on it, which is what
//!   amplifies tail latency under load

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::observability::metrics;

/// Cost model for a faulted request.
pub trait WorkSimulator: Send + Sync + fmt::Debug {
    /// Synchronous CPU work. Called from the blocking pool.
    fn burn(&self);

    /// How long the shared degradation lock is held.
    fn hold(&self) -> Duration;
}

/// Tight arithmetic loop followed by a fixed lock hold.
#[derive(Debug, Clone, Copy)]
pub struct CostedWork {
    pub iterations: u64,
    pub hold: Duration,
}

impl Default for CostedWork {
    fn default() -> Self {
        Self {
            iterations: 30_000_000,
            hold: Duration::from_millis(50),
        }
    }
}

impl WorkSimulator for CostedWork {
    fn burn(&self) {
        let mut acc = 0u64;
        for i in 0..self.iterations {
            acc = acc.wrapping_add(std::hint::black_box(i % 7));
        }
        std::hint::black_box(acc);
    }

    fn hold(&self) -> Duration {
        self.hold
    }
}

/// Zero-cost simulator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWork;

impl WorkSimulator for NoWork {
    fn burn(&self) {}

    fn hold(&self) -> Duration {
        Duration::ZERO
    }
}

/// Marker returned when a result was replaced by an injected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("injected fault")]
pub struct InjectedFault;

type Trigger = Box<dyn Fn() -> bool + Send + Sync>;

pub struct FaultInjector {
    trigger: Trigger,
    work: Arc<dyn WorkSimulator>,
    degradation_lock: Mutex<()>,
}

impl fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjector")
            .field("work", &self.work)
            .finish_non_exhaustive()
    }
}

impl FaultInjector {
    /// Fail a `failure_rate` fraction of calls at random.
    pub fn new(failure_rate: f32, work: Arc<dyn WorkSimulator>) -> Self {
        Self::with_trigger(move || fastrand::f32() < failure_rate, work)
    }

    pub fn with_trigger<F>(trigger: F, work: Arc<dyn WorkSimulator>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            trigger: Box::new(trigger),
            work,
            degradation_lock: Mutex::new(()),
        }
    }

    /// Never fails.
    pub fn disabled() -> Self {
        Self::with_trigger(|| false, Arc::new(NoWork))
    }

    /// Pass `outcome` through, or discard it and fail after the simulated cost.
    ///
    /// `on_fault` runs as soon as the fault is decided, before any of the cost.
    pub async fn apply<T, F>(&self, outcome: T, on_fault: F) -> Result<T, InjectedFault>
    where
        F: FnOnce(),
    {
        if !(self.trigger)() {
            return Ok(outcome);
        }
        drop(outcome);
        metrics::record_injected_fault();
        on_fault();

        let work = self.work.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || work.burn()).await {
            tracing::error!(error = %e, "Simulated work did not complete");
        }

        let _held = self.degradation_lock.lock().await;
        tokio::time::sleep(self.work.hold()).await;

        Err(InjectedFault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Instant;

    #[derive(Debug, Default)]
    struct CountingWork {
        burns: AtomicUsize,
        hold: Duration,
    }

    impl WorkSimulator for CountingWork {
        fn burn(&self) {
            self.burns.fetch_add(1, Ordering::SeqCst);
        }

        fn hold(&self) -> Duration {
            self.hold
        }
    }

    #[tokio::test]
    async fn test_disabled_passes_through() {
        let injector = FaultInjector::disabled();
        assert_eq!(injector.apply(42, || {}).await, Ok(42));
    }

    #[tokio::test]
    async fn test_trigger_discards_result_and_does_work() {
        let work = Arc::new(CountingWork::default());
        let injector = FaultInjector::with_trigger(|| true, work.clone());

        assert_eq!(injector.apply("result", || {}).await, Err(InjectedFault));
        assert_eq!(work.burns.load(Ordering::SeqCst), 1);
    }

    #[derive(Debug, Default)]
    struct NotifiedFirst {
        notified: Arc<AtomicBool>,
        seen_at_burn: AtomicBool,
    }

    impl WorkSimulator for NotifiedFirst {
        fn burn(&self) {
            self.seen_at_burn
                .store(self.notified.load(Ordering::SeqCst), Ordering::SeqCst);
        }

        fn hold(&self) -> Duration {
            Duration::ZERO
        }
    }

    #[tokio::test]
    async fn test_on_fault_runs_before_work() {
        let notified = Arc::new(AtomicBool::new(false));
        let work = Arc::new(NotifiedFirst {
            notified: notified.clone(),
            seen_at_burn: AtomicBool::new(false),
        });
        let injector = FaultInjector::with_trigger(|| true, work.clone());

        let result = injector
            .apply((), || notified.store(true, Ordering::SeqCst))
            .await;

        assert_eq!(result, Err(InjectedFault));
        assert!(work.seen_at_burn.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_rate_extremes() {
        let never = FaultInjector::new(0.0, Arc::new(NoWork));
        let always = FaultInjector::new(1.0, Arc::new(NoWork));
        for _ in 0..100 {
            assert!(never.apply((), || panic!("no fault expected")).await.is_ok());
            assert!(always.apply((), || {}).await.is_err());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lock_serializes_faulted_requests() {
        let work = Arc::new(CountingWork {
            burns: AtomicUsize::new(0),
            hold: Duration::from_millis(50),
        });
        let injector = Arc::new(FaultInjector::with_trigger(|| true, work));

        let start = Instant::now();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let injector = injector.clone();
                tokio::spawn(async move { injector.apply((), || {}).await })
            })
            .collect();
        for t in tasks {
            assert!(t.await.unwrap().is_err());
        }

        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_costed_work_burns() {
        let work = CostedWork {
            iterations: 1_000,
            hold: Duration::from_millis(1),
        };
        work.burn();
        assert_eq!(work.hold(), Duration::from_millis(1));
    }
}
