//! Nullable clock: deterministic time for testing.

use snowfall_types::Timestamp;
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    /// Read the time, then move it forward one second.
    pub fn tick(&self) -> Timestamp {
        let now = self.now();
        self.advance(1);
        now
    }
}
