//! Decision status of a block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a block is in its consensus lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Issued into consensus, not yet decided.
    #[default]
    Processing,
    /// Finalized as part of the canonical chain. Terminal.
    Accepted,
    /// Lost to a conflicting block. Terminal.
    Rejected,
}

impl Status {
    /// Whether consensus has reached a final decision on the block.
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}
