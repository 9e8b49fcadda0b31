//! Correlation id sources for outgoing JSON-RPC calls.
//!
//! Ids are for correlation and logging only. Callers inject the source, so
//! tests can swap in [`SequentialIds`] and assert exact values.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces correlation ids. Must be safe to share across in-flight calls.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Random 63-bit non-negative ids.
///
/// Draws from the thread-local generator, which is seeded once per thread and
/// never reseeded per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> u64 {
        rand::random::<u64>() >> 1
    }
}

/// Monotonic counter. Unique within the process until it wraps.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_fit_in_63_bits() {
        let ids = RandomIds;
        for _ in 0..1000 {
            assert!(ids.next_id() <= i64::MAX as u64);
        }
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(ids.next_id(), 8);
        assert_eq!(ids.next_id(), 9);
    }
}
