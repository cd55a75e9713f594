//! Injectable time source for the cache.

use std::time::Instant;

/// Time source the cache reads entry ages from. Swapped for a manual clock
/// in tests so staleness and eviction can be exercised without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
