//! Thread-shareable engine handle.
//!
//! Mutations (`add`, `record_poll`) hold the write lock for their whole
//! accept/reject cascade; queries share the read lock.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use snowfall_consensus::{Bag, Block, ConsensusError, DecisionListener, Topological};
use snowfall_types::BlockId;

/// Cloneable handle to one engine.
pub struct SharedEngine<B, L> {
    inner: Arc<RwLock<Topological<B, L>>>,
}

impl<B, L> Clone for SharedEngine<B, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Block, L: DecisionListener<B>> SharedEngine<B, L> {
    pub fn new(engine: Topological<B, L>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    // Poisoning is ignored: engine state is complete before any listener
    // callback runs.
    fn read(&self) -> RwLockReadGuard<'_, Topological<B, L>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Topological<B, L>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, block: B) -> Result<(), ConsensusError> {
        self.write().add(block)
    }

    pub fn record_poll(&self, votes: &Bag) {
        self.write().record_poll(votes)
    }

    pub fn preferred(&self) -> BlockId {
        self.read().preferred()
    }

    pub fn last_accepted(&self) -> BlockId {
        self.read().last_accepted()
    }

    pub fn last_accepted_height(&self) -> u64 {
        self.read().last_accepted_height()
    }

    pub fn is_accepted(&self, id: &BlockId) -> bool {
        self.read().is_accepted(id)
    }

    pub fn is_rejected(&self, id: &BlockId) -> bool {
        self.read().is_rejected(id)
    }

    pub fn num_processing(&self) -> usize {
        self.read().num_processing()
    }

    /// Run `f` against the listener under the read lock.
    pub fn with_listener<R>(&self, f: impl FnOnce(&L) -> R) -> R {
        f(self.read().listener())
    }
}
