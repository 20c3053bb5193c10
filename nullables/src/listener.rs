//! Decision listener that remembers everything it was told.

use crate::block::NullBlock;
use snowfall_consensus::DecisionListener;
use snowfall_types::BlockId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted(BlockId),
    Rejected(BlockId),
}

/// Records every accept and reject callback in the order it arrived.
#[derive(Debug, Default)]
pub struct RecordingListener {
    decisions: Vec<Decision>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn accepted(&self) -> Vec<BlockId> {
        self.decisions
            .iter()
            .filter_map(|d| match d {
                Decision::Accepted(id) => Some(*id),
                Decision::Rejected(_) => None,
            })
            .collect()
    }

    pub fn rejected(&self) -> Vec<BlockId> {
        self.decisions
            .iter()
            .filter_map(|d| match d {
                Decision::Rejected(id) => Some(*id),
                Decision::Accepted(_) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.decisions.clear();
    }
}

impl DecisionListener<NullBlock> for RecordingListener {
    fn on_accept(&mut self, block: &NullBlock) {
        self.decisions.push(Decision::Accepted(block.id));
    }

    fn on_reject(&mut self, block: &NullBlock) {
        self.decisions.push(Decision::Rejected(block.id));
    }
}
