//! Block-tree consensus engine.
//!
//! Holds every pending block in a tree rooted at the last accepted block.
//! Each block carries one voting instance deciding which of its children is
//! canonical. A poll's votes for a block also count for every ancestor of it,
//! on the branch that leads to it; any block whose subtree gathered fewer
//! than alpha votes falters. Decisions cascade from the root: a finalized
//! root accepts its preferred child, rejects every sibling subtree, and hands
//! the root role to the accepted child, which may in turn be finalized.

use crate::bag::Bag;
use crate::block::{Block, DecisionListener};
use crate::block_node::BlockNode;
use crate::decided::DecidedCache;
use crate::error::ConsensusError;
use crate::snowball::{Parameters, VotingVariant};
use snowfall_types::{BlockId, Status};
use std::collections::HashMap;
use std::fmt;

/// Default number of decisions remembered after blocks leave the tree.
pub const DEFAULT_DECIDED_CAPACITY: usize = 8192;

/// The consensus engine for a linear chain of blocks.
///
/// Not internally synchronized: callers serialize `add` and `record_poll`
/// and may run the read-only queries concurrently between mutations.
pub struct Topological<B, L> {
    params: Parameters,
    variant: VotingVariant,
    listener: L,
    /// Root of the tree: the most recently accepted block.
    last_accepted: BlockId,
    last_accepted_height: u64,
    /// Every tracked block, root included.
    nodes: HashMap<BlockId, BlockNode<B>>,
    decided: DecidedCache,
    poll_number: u64,
}

impl<B: Block, L: DecisionListener<B>> Topological<B, L> {
    /// Start an engine whose accepted frontier is `last_accepted` at `height`.
    pub fn new(
        params: Parameters,
        variant: VotingVariant,
        last_accepted: BlockId,
        height: u64,
        listener: L,
    ) -> Result<Self, ConsensusError> {
        params.verify()?;
        if params.allows_split_quorum() {
            tracing::warn!(
                k = params.k,
                alpha = params.alpha,
                "two blocks can both reach alpha; ties resolve to the smaller id"
            );
        }
        let mut nodes = HashMap::new();
        nodes.insert(last_accepted, BlockNode::new(None));
        Ok(Self {
            params,
            variant,
            listener,
            last_accepted,
            last_accepted_height: height,
            nodes,
            decided: DecidedCache::new(DEFAULT_DECIDED_CAPACITY),
            poll_number: 0,
        })
    }

    /// Bound the decided-block cache to `capacity` entries.
    pub fn with_decided_capacity(mut self, capacity: usize) -> Self {
        self.decided = DecidedCache::new(capacity);
        self
    }

    pub fn parameters(&self) -> Parameters {
        self.params
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Issue a candidate block into consensus.
    ///
    /// A block whose parent was already decided against the current chain
    /// can never be accepted and is rejected on the spot.
    pub fn add(&mut self, block: B) -> Result<(), ConsensusError> {
        let id = block.id();
        if block.status().is_decided() {
            return Err(ConsensusError::AlreadyDecided(id));
        }
        if self.nodes.contains_key(&id) || self.decided.contains(&id) {
            return Err(ConsensusError::DuplicateBlock(id));
        }

        let parent = block.parent();
        if parent != self.last_accepted && self.decided.contains(&parent) {
            tracing::debug!(block = %id, %parent, "rejecting child of decided block");
            self.decided.insert(id, Status::Rejected);
            self.listener.on_reject(&block);
            return Ok(());
        }

        let parent_height = match self.nodes.get(&parent) {
            None => return Err(ConsensusError::InvalidParent { block: id, parent }),
            Some(node) => match &node.block {
                Some(blk) if parent != self.last_accepted => blk.height(),
                _ => self.last_accepted_height,
            },
        };
        let expected = parent_height + 1;
        if block.height() != expected {
            return Err(ConsensusError::InvalidHeight {
                block: id,
                expected,
                actual: block.height(),
            });
        }

        if let Some(node) = self.nodes.get_mut(&parent) {
            node.branch.add_child(self.params, self.variant, id);
        }
        self.nodes.insert(id, BlockNode::new(Some(block)));
        tracing::trace!(block = %id, %parent, height = expected, "block issued");
        Ok(())
    }

    /// Apply one aggregated poll: `votes` maps each voted block to the weight
    /// of the responses preferring it.
    ///
    /// Entries for unknown blocks are dropped; the rest of the poll still
    /// applies.
    pub fn record_poll(&mut self, votes: &Bag) {
        self.poll_number += 1;
        let tallies = self.tally(votes);

        // Parents are always popped before their children.
        let mut stack = vec![self.last_accepted];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                // Rejected earlier in this pass.
                continue;
            };
            if node.branch.is_childless() {
                continue;
            }

            match tallies.get(&id) {
                Some(bag) if bag.len() >= self.params.alpha => {
                    node.branch.record_poll(self.params, bag);
                }
                tally => {
                    tracing::debug!(
                        block = %id,
                        votes = tally.map_or(0, Bag::len),
                        "subtree below alpha, faltering"
                    );
                    node.branch.record_unsuccessful_poll();
                }
            }

            let children = node.branch.children();
            if id == self.last_accepted && node.branch.finalized() {
                self.accept_preferred_child(id);
            }
            stack.extend(children.into_iter().filter(|c| self.nodes.contains_key(c)));
        }

        tracing::trace!(
            poll = self.poll_number,
            votes = votes.len(),
            last_accepted = %self.last_accepted,
            processing = self.num_processing(),
            "poll recorded"
        );
    }

    /// Credit every vote to the branch it lies on, at every ancestor up to
    /// the root. The result holds, per tracked block, the weight gathered by
    /// each of its children's subtrees.
    fn tally(&self, votes: &Bag) -> HashMap<BlockId, Bag> {
        let mut tallies: HashMap<BlockId, Bag> = HashMap::new();
        for (voted, weight) in votes.iter() {
            if !self.nodes.contains_key(voted) {
                tracing::debug!(
                    error = %ConsensusError::UnknownVoteTarget(*voted),
                    weight,
                    "dropping vote"
                );
                continue;
            }
            let mut child = *voted;
            while let Some(parent) = self.parent_of(&child) {
                tallies.entry(parent).or_default().add_count(child, weight);
                child = parent;
            }
        }
        tallies
    }

    /// Parent of a tracked block, `None` for the root.
    fn parent_of(&self, id: &BlockId) -> Option<BlockId> {
        if *id == self.last_accepted {
            return None;
        }
        self.nodes
            .get(id)
            .and_then(|node| node.block.as_ref())
            .map(Block::parent)
    }

    /// Accept the root's preferred child and make it the new root.
    ///
    /// The tree, root and decided cache are final before any listener
    /// callback runs.
    fn accept_preferred_child(&mut self, root: BlockId) {
        let Some(preferred) = self.nodes.get(&root).and_then(|n| n.branch.preference()) else {
            return;
        };
        let Some(height) = self
            .nodes
            .get(&preferred)
            .and_then(|n| n.block.as_ref())
            .map(Block::height)
        else {
            return;
        };
        let Some(root_node) = self.nodes.remove(&root) else {
            return;
        };

        self.last_accepted = preferred;
        self.last_accepted_height = height;
        self.decided.insert(root, Status::Accepted);
        let losers = root_node
            .branch
            .children()
            .into_iter()
            .filter(|child| *child != preferred)
            .collect();
        let rejected = self.prune(losers);

        tracing::info!(block = %preferred, height, "block accepted");
        if let Some(blk) = self.nodes.get(&preferred).and_then(|n| n.block.as_ref()) {
            self.listener.on_accept(blk);
        }
        for blk in &rejected {
            tracing::debug!(block = %blk.id(), height = blk.height(), "block rejected");
            self.listener.on_reject(blk);
        }
    }

    /// Remove every block in the subtrees rooted at `rejected` and record
    /// each as rejected exactly once. Returns the removed blocks in removal
    /// order.
    fn prune(&mut self, mut rejected: Vec<BlockId>) -> Vec<B> {
        let mut removed = Vec::new();
        while let Some(id) = rejected.pop() {
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            self.decided.insert(id, Status::Rejected);
            rejected.extend(node.branch.children());
            removed.extend(node.block);
        }
        removed
    }

    /// Tip of the preferred chain: follow each block's preferred child from
    /// the root until a block without children.
    pub fn preferred(&self) -> BlockId {
        let mut id = self.last_accepted;
        while let Some(next) = self.nodes.get(&id).and_then(|n| n.branch.preference()) {
            id = next;
        }
        id
    }

    /// Whether `id` lies on the preferred chain, the root included.
    pub fn is_preferred(&self, id: &BlockId) -> bool {
        let mut current = self.last_accepted;
        loop {
            if current == *id {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.branch.preference()) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    pub fn last_accepted(&self) -> BlockId {
        self.last_accepted
    }

    pub fn last_accepted_height(&self) -> u64 {
        self.last_accepted_height
    }

    pub fn is_accepted(&self, id: &BlockId) -> bool {
        *id == self.last_accepted || self.decided.is_accepted(id)
    }

    pub fn is_rejected(&self, id: &BlockId) -> bool {
        self.decided.is_rejected(id)
    }

    pub fn decided(&self, id: &BlockId) -> bool {
        self.is_accepted(id) || self.is_rejected(id)
    }

    pub fn is_processing(&self, id: &BlockId) -> bool {
        *id != self.last_accepted && self.nodes.contains_key(id)
    }

    /// Number of blocks issued but not yet decided.
    pub fn num_processing(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Number of polls recorded so far.
    pub fn poll_number(&self) -> u64 {
        self.poll_number
    }
}

impl<B: Block, L> fmt::Display for Topological<B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Topological(params = {:?}, last accepted = {} @ {})",
            self.params, self.last_accepted, self.last_accepted_height
        )?;
        let mut stack = vec![(self.last_accepted, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            writeln!(f, "{}{:?}: {}", "    ".repeat(depth), id, node)?;
            let children = node.branch.children();
            stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
        }
        Ok(())
    }
}
