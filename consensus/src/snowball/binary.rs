//! Two-way confidence counter, deciding one bit of the tree variant.

use std::fmt;

/// Tracks a preference between sides `0` and `1` and the streak of successful
/// polls backing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinarySnowball {
    beta: u32,
    preference: usize,
    confidence: u32,
    finalized: bool,
}

impl BinarySnowball {
    pub fn new(beta: u32, choice: usize) -> Self {
        Self::with_state(beta, choice, 0, false)
    }

    pub(crate) fn with_state(beta: u32, choice: usize, confidence: u32, finalized: bool) -> Self {
        Self {
            beta,
            preference: choice,
            confidence,
            finalized,
        }
    }

    pub fn preference(&self) -> usize {
        self.preference
    }

    pub fn confidence(&self) -> u32 {
        self.confidence
    }

    pub fn finalized(&self) -> bool {
        self.finalized
    }

    /// `choice` reached alpha. Switching sides restarts the streak at one.
    pub fn record_successful_poll(&mut self, choice: usize) {
        if self.finalized {
            return;
        }
        if choice == self.preference {
            self.confidence += 1;
        } else {
            self.preference = choice;
            self.confidence = 1;
        }
        self.finalized = self.confidence >= self.beta;
    }

    pub fn record_unsuccessful_poll(&mut self) {
        if !self.finalized {
            self.confidence = 0;
        }
    }
}

impl fmt::Display for BinarySnowball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SB(Preference = {}, Confidence = {}, Finalized = {})",
            self.preference, self.confidence, self.finalized
        )
    }
}
