//! In-flight gauge used for load shedding.
//!
//! Counts requests that passed the bulkhead and checks the count against a
//! ceiling that is configured separately from bulkhead capacity.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::observability::metrics;

#[derive(Debug)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    ceiling: usize,
}

impl ConcurrencyGauge {
    pub fn new(ceiling: usize) -> Self {
        Self {
            current: AtomicUsize::new(0),
            ceiling,
        }
    }

    /// Register a request as in flight until the guard is dropped.
    pub fn enter(&self) -> InFlightGuard<'_> {
        let level = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_in_flight(level);
        InFlightGuard { gauge: self, level }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}

/// Keeps one request counted in the gauge.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    gauge: &'a ConcurrencyGauge,
    level: usize,
}

impl InFlightGuard<'_> {
    /// Gauge value observed when this request entered.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn exceeds_ceiling(&self) -> bool {
        self.level > self.gauge.ceiling
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let remaining = self.gauge.current.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_in_flight(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_enter_and_leave() {
        let gauge = ConcurrencyGauge::new(2);
        {
            let a = gauge.enter();
            let b = gauge.enter();
            assert_eq!(gauge.current(), 2);
            assert!(!a.exceeds_ceiling());
            assert!(!b.exceeds_ceiling());

            let c = gauge.enter();
            assert_eq!(c.level(), 3);
            assert!(c.exceeds_ceiling());
        }
        assert_eq!(gauge.current(), 0);
    }

    #[test]
    fn test_rejected_entry_still_released() {
        let gauge = ConcurrencyGauge::new(0);
        let guard = gauge.enter();
        assert!(guard.exceeds_ceiling());
        drop(guard);
        assert_eq!(gauge.current(), 0);
    }

    #[test]
    fn test_returns_to_zero_after_burst() {
        let gauge = Arc::new(ConcurrencyGauge::new(1000));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gauge = gauge.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let guard = gauge.enter();
                        assert!(guard.level() >= 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(gauge.current(), 0);
    }
}
