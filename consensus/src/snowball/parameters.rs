//! Sampling and finality parameters shared by every voting instance.

use crate::error::ConsensusError;
use serde::{Deserialize, Serialize};

/// Immutable per-engine voting parameters.
///
/// - `k`: sample size of one poll.
/// - `alpha`: votes an alternative needs in one poll for the poll to count.
/// - `beta_virtuous`: consecutive successful polls that finalize a choice
///   nobody contests.
/// - `beta_rogue`: consecutive successful polls that finalize a choice once a
///   conflicting alternative exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub k: u64,
    pub alpha: u64,
    pub beta_virtuous: u32,
    pub beta_rogue: u32,
}

impl Parameters {
    /// Parameters with a single finality threshold for contested and
    /// uncontested choices alike.
    pub fn new(k: u64, alpha: u64, beta: u32) -> Self {
        Self {
            k,
            alpha,
            beta_virtuous: beta,
            beta_rogue: beta,
        }
    }

    /// Check `1 <= alpha <= k` and `1 <= beta_virtuous <= beta_rogue`.
    pub fn verify(&self) -> Result<(), ConsensusError> {
        if self.alpha == 0 {
            return Err(ConsensusError::InvalidParameters(
                "alpha must be at least 1".into(),
            ));
        }
        if self.alpha > self.k {
            return Err(ConsensusError::InvalidParameters(format!(
                "alpha ({}) must not exceed k ({})",
                self.alpha, self.k
            )));
        }
        if self.beta_virtuous == 0 {
            return Err(ConsensusError::InvalidParameters(
                "beta_virtuous must be at least 1".into(),
            ));
        }
        if self.beta_rogue < self.beta_virtuous {
            return Err(ConsensusError::InvalidParameters(format!(
                "beta_rogue ({}) must be at least beta_virtuous ({})",
                self.beta_rogue, self.beta_virtuous
            )));
        }
        Ok(())
    }

    /// Whether two alternatives can both reach alpha in one poll, which makes
    /// the tie-break rule observable.
    pub fn allows_split_quorum(&self) -> bool {
        self.alpha.saturating_mul(2) <= self.k
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            k: 20,
            alpha: 15,
            beta_virtuous: 15,
            beta_rogue: 20,
        }
    }
}
