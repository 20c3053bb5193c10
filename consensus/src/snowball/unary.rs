//! Confidence counter for a choice with no competing alternative.

use super::binary::BinarySnowball;
use std::fmt;

/// Counts consecutive successful polls for the one known alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnarySnowball {
    beta: u32,
    confidence: u32,
    finalized: bool,
}

impl UnarySnowball {
    pub fn new(beta: u32) -> Self {
        Self {
            beta,
            confidence: 0,
            finalized: false,
        }
    }

    pub fn record_successful_poll(&mut self) {
        if self.finalized {
            return;
        }
        self.confidence += 1;
        self.finalized = self.confidence >= self.beta;
    }

    /// Falter: the streak is broken. A finalized instance is left untouched.
    pub fn record_unsuccessful_poll(&mut self) {
        if !self.finalized {
            self.confidence = 0;
        }
    }

    pub fn confidence(&self) -> u32 {
        self.confidence
    }

    pub fn finalized(&self) -> bool {
        self.finalized
    }

    /// Turn this counter into a two-way instance preferring `choice`,
    /// keeping the streak gathered so far.
    pub fn extend(&self, beta: u32, choice: usize) -> BinarySnowball {
        BinarySnowball::with_state(beta, choice, self.confidence, self.finalized)
    }
}

impl fmt::Display for UnarySnowball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SB(Confidence = {}, Finalized = {})",
            self.confidence, self.finalized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalizes_after_beta_successes() {
        let mut sb = UnarySnowball::new(2);
        sb.record_successful_poll();
        assert!(!sb.finalized());
        sb.record_successful_poll();
        assert!(sb.finalized());
        assert_eq!(sb.confidence(), 2);
    }

    #[test]
    fn unsuccessful_poll_resets_streak() {
        let mut sb = UnarySnowball::new(3);
        sb.record_successful_poll();
        sb.record_successful_poll();
        sb.record_unsuccessful_poll();
        assert_eq!(sb.confidence(), 0);
        sb.record_successful_poll();
        sb.record_successful_poll();
        assert!(!sb.finalized());
        sb.record_successful_poll();
        assert!(sb.finalized());
    }

    #[test]
    fn finalized_is_sticky() {
        let mut sb = UnarySnowball::new(1);
        sb.record_successful_poll();
        sb.record_unsuccessful_poll();
        assert!(sb.finalized());
        assert_eq!(sb.confidence(), 1);
    }

    #[test]
    fn extend_carries_confidence() {
        let mut sb = UnarySnowball::new(5);
        sb.record_successful_poll();
        sb.record_successful_poll();
        let binary = sb.extend(4, 1);
        assert_eq!(binary.preference(), 1);
        assert_eq!(binary.confidence(), 2);
        assert!(!binary.finalized());
    }
}
