//! In-memory block carrying only what consensus reads.

use snowfall_consensus::Block;
use snowfall_types::{BlockId, Status, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullBlock {
    pub id: BlockId,
    pub parent: BlockId,
    pub height: u64,
    pub timestamp: Timestamp,
    pub status: Status,
}

impl NullBlock {
    pub fn new(id: BlockId, parent: BlockId, height: u64, timestamp: Timestamp) -> Self {
        Self {
            id,
            parent,
            height,
            timestamp,
            status: Status::Processing,
        }
    }

    /// Same block claiming a different height.
    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

impl Block for NullBlock {
    fn id(&self) -> BlockId {
        self.id
    }

    fn parent(&self) -> BlockId {
        self.parent
    }

    fn height(&self) -> u64 {
        self.height
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn status(&self) -> Status {
        self.status
    }
}
