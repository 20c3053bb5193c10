//! Flat multi-way instance: one confidence streak over any number of
//! alternatives.

use super::{Consensus, Parameters, UnarySnowball};
use crate::bag::Bag;
use snowfall_types::BlockId;
use std::collections::BTreeSet;
use std::fmt;

/// Decides among a growing set of alternatives by polling all of them at once.
///
/// Only the preferred alternative can carry a non-zero streak: a successful
/// poll for a different alternative moves the preference there and restarts
/// the count, which is the same as zeroing every other alternative.
#[derive(Clone, Debug)]
pub struct NnarySnowball {
    params: Parameters,
    choices: BTreeSet<BlockId>,
    preference: BlockId,
    confidence: u32,
    finalized: bool,
}

impl NnarySnowball {
    /// Create an instance whose first alternative is preferred unconditionally.
    pub fn new(params: Parameters, choice: BlockId) -> Self {
        let mut choices = BTreeSet::new();
        choices.insert(choice);
        Self {
            params,
            choices,
            preference: choice,
            confidence: 0,
            finalized: false,
        }
    }

    /// Continue the streak `choice` gathered as a lone alternative.
    pub fn from_unary(params: Parameters, choice: BlockId, streak: &UnarySnowball) -> Self {
        Self {
            confidence: streak.confidence(),
            finalized: streak.finalized(),
            ..Self::new(params, choice)
        }
    }

    /// Streak for `choice`; zero for anything but the preference.
    pub fn confidence(&self, choice: &BlockId) -> u32 {
        if *choice == self.preference {
            self.confidence
        } else {
            0
        }
    }

    pub fn num_choices(&self) -> usize {
        self.choices.len()
    }

    fn beta(&self) -> u32 {
        if self.choices.len() > 1 {
            self.params.beta_rogue
        } else {
            self.params.beta_virtuous
        }
    }
}

impl Consensus for NnarySnowball {
    fn add(&mut self, choice: BlockId) {
        if self.finalized {
            return;
        }
        self.choices.insert(choice);
    }

    fn preference(&self) -> BlockId {
        self.preference
    }

    fn record_poll(&mut self, votes: &Bag) -> bool {
        let mut top: Option<(BlockId, u64)> = None;
        for (id, count) in votes.iter().filter(|(id, _)| self.choices.contains(id)) {
            match top {
                Some((_, best)) if count <= best => {}
                _ => top = Some((*id, count)),
            }
        }

        let winner = match top {
            Some((id, count)) if count >= self.params.alpha => id,
            _ => {
                self.record_unsuccessful_poll();
                return false;
            }
        };

        if self.finalized {
            return true;
        }
        if winner == self.preference {
            self.confidence += 1;
        } else {
            self.preference = winner;
            self.confidence = 1;
        }
        self.finalized = self.confidence >= self.beta();
        true
    }

    fn record_unsuccessful_poll(&mut self) {
        if !self.finalized {
            self.confidence = 0;
        }
    }

    fn finalized(&self) -> bool {
        self.finalized
    }
}

impl fmt::Display for NnarySnowball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SB(Preference = {:?}, Choices = {}, Confidence = {}, Finalized = {})",
            self.preference,
            self.choices.len(),
            self.confidence,
            self.finalized
        )
    }
}
