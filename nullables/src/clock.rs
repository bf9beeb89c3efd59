//! Nullable clock: deterministic block heights for testing.

use ballot_types::BlockHeight;
use std::cell::Cell;

/// A deterministic height source for testing.
///
/// Height only advances when you tell it to, and never goes backwards.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: Cell::new(initial_height),
        }
    }

    /// Get the current height.
    pub fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.get())
    }

    /// Advance by a number of blocks.
    pub fn advance(&self, blocks: u64) {
        self.current.set(self.current.get() + blocks);
    }

    /// Jump to a specific height.
    ///
    /// # Panics
    /// Panics if `height` is lower than the current height.
    pub fn set(&self, height: u64) {
        assert!(height >= self.current.get(), "heights never decrease");
        self.current.set(height);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_set() {
        let clock = NullClock::new(5);
        clock.advance(3);
        assert_eq!(clock.now(), BlockHeight::new(8));
        clock.set(20);
        assert_eq!(clock.now().as_u64(), 20);
    }

    #[test]
    #[should_panic(expected = "heights never decrease")]
    fn set_backwards_panics() {
        let clock = NullClock::new(10);
        clock.set(9);
    }
}
