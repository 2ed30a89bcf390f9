use std::sync::atomic::{AtomicI64, Ordering};

use crate::UnixTimestamp;

/// Source of timestamps for mutations.
///
/// The core never reads time ambiently; the host injects a clock so that a
/// replayed mutation log produces identical state.
pub trait Clock {
    /// Returns the current unix timestamp in seconds.
    fn unix_timestamp(&self) -> UnixTimestamp;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn unix_timestamp(&self) -> UnixTimestamp {
        (**self).unix_timestamp()
    }
}

/// Clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> UnixTimestamp {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as UnixTimestamp)
            .unwrap_or_default()
    }
}

/// Clock that returns a host-settable timestamp.
///
/// Useful for deterministic replay and for tests.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    /// Create a clock fixed at the given timestamp.
    pub fn new(now: UnixTimestamp) -> Self {
        Self(AtomicI64::new(now))
    }

    /// Set the timestamp returned by subsequent reads.
    pub fn set(&self, now: UnixTimestamp) {
        self.0.store(now, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn unix_timestamp(&self) -> UnixTimestamp {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_returns_what_was_set() {
        let clock = ManualClock::new(42);
        assert_eq!(clock.unix_timestamp(), 42);
        clock.set(1_700_000_000);
        assert_eq!(clock.unix_timestamp(), 1_700_000_000);
    }
}
