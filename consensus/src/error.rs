use snowfall_types::BlockId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("block {block} names parent {parent}, which is neither the last accepted block nor processing")]
    InvalidParent { block: BlockId, parent: BlockId },

    #[error("block {0} was already added")]
    DuplicateBlock(BlockId),

    #[error("block {block} has height {actual}, expected {expected}")]
    InvalidHeight {
        block: BlockId,
        expected: u64,
        actual: u64,
    },

    #[error("block {0} is already decided")]
    AlreadyDecided(BlockId),

    #[error("vote for unknown block {0}")]
    UnknownVoteTarget(BlockId),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}
