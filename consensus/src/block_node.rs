//! One tracked block and the vote over which of its children is canonical.

use crate::bag::Bag;
use crate::block::Block;
use crate::snowball::{Consensus, Parameters, UnarySnowball, VotingVariant};
use snowfall_types::BlockId;
use std::collections::BTreeSet;
use std::fmt;

/// The choice a block arbitrates between its issued children.
pub(crate) enum Branch {
    /// No child issued yet; nothing to vote on.
    Childless,
    /// One child: no alternative to pick, only a streak to build.
    Single {
        child: BlockId,
        snowball: UnarySnowball,
    },
    /// Two or more children competing through a multi-way instance.
    Contested {
        children: BTreeSet<BlockId>,
        consensus: Box<dyn Consensus>,
    },
}

impl Branch {
    /// Issue `child` under this block. A second child turns the branch into a
    /// contest that keeps the streak the first child built; from then on
    /// finalizing takes `beta_rogue` successes.
    pub(crate) fn add_child(&mut self, params: Parameters, variant: VotingVariant, child: BlockId) {
        match self {
            Self::Childless => {
                *self = Self::Single {
                    child,
                    snowball: UnarySnowball::new(params.beta_virtuous),
                };
            }
            Self::Single {
                child: first,
                snowball,
            } => {
                let first = *first;
                let mut consensus = variant.extend(params, first, snowball.clone());
                consensus.add(child);
                *self = Self::Contested {
                    children: [first, child].into_iter().collect(),
                    consensus,
                };
            }
            Self::Contested {
                children,
                consensus,
            } => {
                children.insert(child);
                consensus.add(child);
            }
        }
    }

    pub(crate) fn children(&self) -> Vec<BlockId> {
        match self {
            Self::Childless => Vec::new(),
            Self::Single { child, .. } => vec![*child],
            Self::Contested { children, .. } => children.iter().copied().collect(),
        }
    }

    pub(crate) fn is_childless(&self) -> bool {
        matches!(self, Self::Childless)
    }

    pub(crate) fn preference(&self) -> Option<BlockId> {
        match self {
            Self::Childless => None,
            Self::Single { child, .. } => Some(*child),
            Self::Contested { consensus, .. } => Some(consensus.preference()),
        }
    }

    pub(crate) fn finalized(&self) -> bool {
        match self {
            Self::Childless => false,
            Self::Single { snowball, .. } => snowball.finalized(),
            Self::Contested { consensus, .. } => consensus.finalized(),
        }
    }

    /// Apply the per-child tally gathered for this block in one poll.
    pub(crate) fn record_poll(&mut self, params: Parameters, votes: &Bag) -> bool {
        match self {
            Self::Childless => false,
            Self::Single { child, snowball } => {
                if votes.count(child) >= params.alpha {
                    snowball.record_successful_poll();
                    true
                } else {
                    snowball.record_unsuccessful_poll();
                    false
                }
            }
            Self::Contested { consensus, .. } => consensus.record_poll(votes),
        }
    }

    pub(crate) fn record_unsuccessful_poll(&mut self) {
        match self {
            Self::Childless => {}
            Self::Single { snowball, .. } => snowball.record_unsuccessful_poll(),
            Self::Contested { consensus, .. } => consensus.record_unsuccessful_poll(),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Childless => write!(f, "childless"),
            Self::Single { child, snowball } => write!(f, "single {:?} {}", child, snowball),
            Self::Contested { children, consensus } => {
                write!(f, "contested by {} children: {}", children.len(), consensus)
            }
        }
    }
}

/// A node of the pending tree.
pub(crate) struct BlockNode<B> {
    /// `None` only for the last accepted block the engine started from.
    pub(crate) block: Option<B>,
    pub(crate) branch: Branch,
}

impl<B> BlockNode<B> {
    pub(crate) fn new(block: Option<B>) -> Self {
        Self {
            block,
            branch: Branch::Childless,
        }
    }
}

impl<B: Block> fmt::Display for BlockNode<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(blk) = &self.block {
            write!(
                f,
                "blk: ID: {} Status: {} Parent: {} Height: {} Timestamp: {} ",
                blk.id(),
                blk.status(),
                blk.parent(),
                blk.height(),
                blk.timestamp()
            )?;
        }
        write!(f, "branch: {}", self.branch)
    }
}
