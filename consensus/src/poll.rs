//! Poll aggregation: condenses per-validator responses into the vote bag the
//! engine records.

use crate::bag::Bag;
use snowfall_types::{BlockId, NodeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One outstanding query to a sample of validators.
///
/// A validator sampled more than once carries that many votes.
#[derive(Debug, Clone)]
pub struct Poll {
    alpha: u64,
    /// Validators yet to answer and the weight each carries.
    outstanding: HashMap<NodeId, u64>,
    remaining: u64,
    votes: Bag,
}

impl Poll {
    pub fn new(alpha: u64, sampled: impl IntoIterator<Item = NodeId>) -> Self {
        let mut outstanding = HashMap::new();
        let mut remaining = 0;
        for node in sampled {
            *outstanding.entry(node).or_insert(0) += 1;
            remaining += 1;
        }
        Self {
            alpha,
            outstanding,
            remaining,
            votes: Bag::new(),
        }
    }

    /// Record `node`'s preferred block. Responses from validators that were
    /// not sampled, or already answered, are ignored.
    pub fn vote(&mut self, node: &NodeId, block: BlockId) {
        if let Some(weight) = self.outstanding.remove(node) {
            self.remaining -= weight;
            self.votes.add_count(block, weight);
        }
    }

    /// `node` failed to answer or answered with nothing usable.
    pub fn drop_node(&mut self, node: &NodeId) {
        if let Some(weight) = self.outstanding.remove(node) {
            self.remaining -= weight;
        }
    }

    /// Every sampled validator answered, or the weight still outstanding
    /// can no longer lift the poll to alpha.
    pub fn finished(&self) -> bool {
        self.remaining == 0 || self.votes.len() + self.remaining < self.alpha
    }

    pub fn votes(&self) -> &Bag {
        &self.votes
    }

    pub fn into_votes(self) -> Bag {
        self.votes
    }
}

impl fmt::Display for Poll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waiting on {} weight from {} validators, received {}",
            self.remaining,
            self.outstanding.len(),
            self.votes
        )
    }
}

/// Outstanding polls keyed by request id.
///
/// Results are released strictly in request order: a poll that finishes
/// before an earlier one is held back until the earlier one finishes too.
#[derive(Debug, Default)]
pub struct PollSet {
    alpha: u64,
    polls: BTreeMap<u32, Poll>,
}

impl PollSet {
    pub fn new(alpha: u64) -> Self {
        Self {
            alpha,
            polls: BTreeMap::new(),
        }
    }

    /// Start tracking a poll. Returns `false` if `request_id` is already in
    /// use.
    pub fn add(&mut self, request_id: u32, sampled: impl IntoIterator<Item = NodeId>) -> bool {
        if self.polls.contains_key(&request_id) {
            tracing::debug!(request_id, "poll already outstanding");
            return false;
        }
        self.polls.insert(request_id, Poll::new(self.alpha, sampled));
        true
    }

    /// Record a response and return every vote bag now ready, oldest first.
    pub fn vote(&mut self, request_id: u32, node: &NodeId, block: BlockId) -> Vec<Bag> {
        match self.polls.get_mut(&request_id) {
            Some(poll) => poll.vote(node, block),
            None => {
                tracing::debug!(request_id, %node, %block, "vote for unknown poll");
                return Vec::new();
            }
        }
        self.drain_finished()
    }

    /// Record a missing response and return every vote bag now ready.
    pub fn drop_node(&mut self, request_id: u32, node: &NodeId) -> Vec<Bag> {
        match self.polls.get_mut(&request_id) {
            Some(poll) => poll.drop_node(node),
            None => return Vec::new(),
        }
        self.drain_finished()
    }

    fn drain_finished(&mut self) -> Vec<Bag> {
        let mut ready = Vec::new();
        while let Some(entry) = self.polls.first_entry() {
            if !entry.get().finished() {
                break;
            }
            let (request_id, poll) = entry.remove_entry();
            tracing::trace!(request_id, votes = %poll.votes(), "poll finished");
            ready.push(poll.into_votes());
        }
        ready
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }
}
