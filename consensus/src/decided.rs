//! Decided-block cache: answers "was this block accepted or rejected?" for
//! blocks that have left the pending tree.
//!
//! This is a bounded FIFO map: when full, the oldest decision is evicted to
//! make room for a new one. Lookups are O(1) via a `HashMap`.

use snowfall_types::{BlockId, Status};
use std::collections::{HashMap, VecDeque};

/// A bounded record of recent accept/reject decisions.
pub struct DecidedCache {
    decisions: HashMap<BlockId, Status>,
    order: VecDeque<BlockId>,
    capacity: usize,
}

impl DecidedCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            decisions: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a decision, evicting the oldest entry if at capacity.
    ///
    /// Decisions are final, so re-inserting a known block is a no-op.
    pub fn insert(&mut self, id: BlockId, status: Status) {
        if self.capacity == 0 || !status.is_decided() {
            return;
        }
        if self.decisions.contains_key(&id) {
            return;
        }
        if self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.decisions.remove(&evicted);
            }
        }
        self.decisions.insert(id, status);
        self.order.push_back(id);
    }

    pub fn status(&self, id: &BlockId) -> Option<Status> {
        self.decisions.get(id).copied()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.decisions.contains_key(id)
    }

    pub fn is_accepted(&self, id: &BlockId) -> bool {
        self.status(id) == Some(Status::Accepted)
    }

    pub fn is_rejected(&self, id: &BlockId) -> bool {
        self.status(id) == Some(Status::Rejected)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}
