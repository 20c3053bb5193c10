//! Capability surface the engine needs from a block, and the decision
//! callbacks it drives.

use snowfall_types::{BlockId, Status, Timestamp};

/// A candidate block as seen by consensus.
///
/// The engine only reads these fields; storage, execution and status
/// persistence stay with the owner of the block.
pub trait Block {
    fn id(&self) -> BlockId;
    fn parent(&self) -> BlockId;
    fn height(&self) -> u64;
    fn timestamp(&self) -> Timestamp;
    fn status(&self) -> Status;
}

/// Receives decisions synchronously, in the order they are made.
///
/// One `record_poll` may produce many callbacks. Each acceptance is followed
/// by the rejection of every block in the subtrees it beat.
pub trait DecisionListener<B> {
    fn on_accept(&mut self, block: &B);
    fn on_reject(&mut self, block: &B);
}
