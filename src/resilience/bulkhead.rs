//! Bulkhead: fixed-capacity admission gate.
//!
//! # Responsibilities
//! - Hand out at most `capacity` permits at a time
//! - Reject immediately when full (never queue)
//!
//! # Design Decisions
//! - Backed by a Tokio semaphore, acquired with `try_acquire_owned`
//! - The permit releases its slot on drop, so every exit path returns it

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug)]
pub struct Bulkhead {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl Bulkhead {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Take a slot if one is free. Never waits.
    pub fn try_acquire(&self) -> Option<BulkheadPermit> {
        self.slots
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| BulkheadPermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}

/// A held bulkhead slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct BulkheadPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_beyond_capacity() {
        let bulkhead = Bulkhead::new(3);
        let held: Vec<_> = (0..3).map(|_| bulkhead.try_acquire().unwrap()).collect();

        assert_eq!(bulkhead.in_use(), 3);
        assert!(bulkhead.try_acquire().is_none());
        assert!(bulkhead.try_acquire().is_none());

        drop(held);
        assert_eq!(bulkhead.in_use(), 0);
    }

    #[test]
    fn test_released_permits_are_reusable() {
        let bulkhead = Bulkhead::new(1);
        for _ in 0..5 {
            let permit = bulkhead.try_acquire();
            assert!(permit.is_some());
            assert!(bulkhead.try_acquire().is_none());
        }
        assert_eq!(bulkhead.available(), 1);
    }

    #[test]
    fn test_more_callers_than_capacity() {
        let bulkhead = Bulkhead::new(50);
        let attempts: Vec<_> = (0..200).map(|_| bulkhead.try_acquire()).collect();

        let admitted = attempts.iter().filter(|p| p.is_some()).count();
        assert_eq!(admitted, 50);
        assert_eq!(attempts.len() - admitted, 150);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_holders_never_exceed_capacity() {
        let bulkhead = Arc::new(Bulkhead::new(8));
        let peak = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let bulkhead = bulkhead.clone();
                let peak = peak.clone();
                tokio::spawn(async move {
                    if let Some(_permit) = bulkhead.try_acquire() {
                        peak.fetch_max(bulkhead.in_use(), std::sync::atomic::Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    }
                })
            })
            .collect();
        for t in tasks {
            t.await.unwrap();
        }

        assert!(peak.load(std::sync::atomic::Ordering::SeqCst) <= 8);
        assert_eq!(bulkhead.in_use(), 0);
    }
}
