use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("consensus error: {0}")]
    Consensus(#[from] snowfall_consensus::ConsensusError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
