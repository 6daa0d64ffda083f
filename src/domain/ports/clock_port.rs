//! Clock port definition.

use std::time::Instant;

/// Monotonic time source for freshness checks.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        /// Creates a clock frozen at the current instant.
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        /// Moves the clock forward.
        pub fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock()
        }
    }
}
