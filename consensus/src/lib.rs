//! Consensus: linear-chain finality through repeated random sampling.
//!
//! Pending blocks form a tree rooted at the last accepted block. Every block
//! with children runs a snowball instance deciding which child is canonical;
//! polls of sampled validators feed those instances, and an instance that
//! gathers enough consecutive successful polls accepts its preferred child
//! and rejects the rest.
//!
//! ## Module overview
//!
//! - [`snowball`]: voting primitives (unary, binary, flat n-ary, bit trie).
//! - [`bag`]: weighted vote multiset.
//! - [`block`]: what the engine needs from a block, and decision callbacks.
//! - [`topological`]: the block-tree engine.
//! - [`decided`]: bounded memory of blocks that left the tree.
//! - [`poll`]: per-request vote aggregation.
//! - [`error`]: consensus error types.

pub mod bag;
pub mod block;
mod block_node;
pub mod decided;
pub mod error;
pub mod poll;
pub mod snowball;
pub mod topological;

pub use bag::Bag;
pub use block::{Block, DecisionListener};
pub use decided::DecidedCache;
pub use error::ConsensusError;
pub use poll::{Poll, PollSet};
pub use snowball::{
    BinarySnowball, Consensus, NnarySnowball, Parameters, Tree, UnarySnowball, VotingVariant,
};
pub use topological::{Topological, DEFAULT_DECIDED_CAPACITY};
