//! Repeated-sampling voting primitives.
//!
//! Every instance answers one question, which of a growing set of
//! alternatives is canonical, by counting consecutive polls in which one
//! alternative gathered at least `alpha` votes. An instance is *finalized*
//! once that streak reaches beta; from then on its preference never changes.
//!
//! - [`UnarySnowball`] / [`BinarySnowball`]: one- and two-way counters.
//! - [`NnarySnowball`]: flat multi-way instance.
//! - [`Tree`]: multi-way instance built from a bit-prefix trie of unary and
//!   binary counters.

mod binary;
mod nnary;
mod parameters;
mod tree;
mod unary;

pub use binary::BinarySnowball;
pub use nnary::NnarySnowball;
pub use parameters::Parameters;
pub use tree::Tree;
pub use unary::UnarySnowball;

use crate::bag::Bag;
use serde::{Deserialize, Serialize};
use snowfall_types::BlockId;
use std::fmt;

/// A multi-way voting instance.
pub trait Consensus: fmt::Display + Send + Sync {
    /// Register another alternative. Ignored once finalized, or when the
    /// alternative already lost a decided prefix.
    fn add(&mut self, choice: BlockId);

    /// The currently preferred alternative.
    fn preference(&self) -> BlockId;

    /// Apply one poll's votes. Returns whether the poll was successful, i.e.
    /// some alternative reached alpha.
    fn record_poll(&mut self, votes: &Bag) -> bool;

    /// Falter: break the current streak without changing the preference.
    fn record_unsuccessful_poll(&mut self);

    /// Whether the preference is final.
    fn finalized(&self) -> bool;
}

/// Which multi-way instance arbitrates between sibling blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingVariant {
    #[default]
    Nnary,
    Tree,
}

impl VotingVariant {
    /// Build an instance preferring `choice`, its only alternative so far.
    pub fn new_consensus(&self, params: Parameters, choice: BlockId) -> Box<dyn Consensus> {
        self.extend(params, choice, UnarySnowball::new(params.beta_virtuous))
    }

    /// Build an instance over `choice` that continues the streak `choice`
    /// already gathered while it had no rival.
    pub fn extend(
        &self,
        params: Parameters,
        choice: BlockId,
        streak: UnarySnowball,
    ) -> Box<dyn Consensus> {
        match self {
            Self::Nnary => Box::new(NnarySnowball::from_unary(params, choice, &streak)),
            Self::Tree => Box::new(Tree::from_unary(params, choice, streak)),
        }
    }
}
