//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use snowfall_consensus::{Block, DecisionListener, Parameters, Topological, VotingVariant};
use snowfall_types::BlockId;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for one consensus engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Validators sampled per poll.
    #[serde(default = "default_k")]
    pub k: u64,

    /// Votes a choice needs within one poll for the poll to count.
    #[serde(default = "default_alpha")]
    pub alpha: u64,

    /// Consecutive successful polls finalizing an uncontested choice.
    #[serde(default = "default_beta_virtuous")]
    pub beta_virtuous: u32,

    /// Consecutive successful polls finalizing a contested choice.
    #[serde(default = "default_beta_rogue")]
    pub beta_rogue: u32,

    /// Voting instance used between sibling blocks: "nnary" or "tree".
    #[serde(default)]
    pub voting: VotingVariant,

    /// Decisions remembered after blocks leave the pending tree.
    #[serde(default = "default_decided_cache_capacity")]
    pub decided_cache_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Level for the snowfall crates ("trace" .. "error"), or a full
    /// `tracing` directive list such as "info,snowfall_consensus=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_k() -> u64 {
    20
}

fn default_alpha() -> u64 {
    15
}

fn default_beta_virtuous() -> u32 {
    15
}

fn default_beta_rogue() -> u32 {
    20
}

fn default_decided_cache_capacity() -> usize {
    snowfall_consensus::DEFAULT_DECIDED_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Validated voting parameters.
    pub fn parameters(&self) -> Result<Parameters, NodeError> {
        let params = Parameters {
            k: self.k,
            alpha: self.alpha,
            beta_virtuous: self.beta_virtuous,
            beta_rogue: self.beta_rogue,
        };
        params.verify()?;
        Ok(params)
    }

    /// Install the global subscriber with the configured format and level.
    pub fn init_logging(&self) -> Result<(), NodeError> {
        crate::logging::init_logging(self.log_format, &self.log_level)
    }

    /// Build an engine rooted at `last_accepted`.
    pub fn build_engine<B, L>(
        &self,
        last_accepted: BlockId,
        height: u64,
        listener: L,
    ) -> Result<Topological<B, L>, NodeError>
    where
        B: Block,
        L: DecisionListener<B>,
    {
        let engine = Topological::new(
            self.parameters()?,
            self.voting,
            last_accepted,
            height,
            listener,
        )?
        .with_decided_capacity(self.decided_cache_capacity);
        tracing::info!(
            k = self.k,
            alpha = self.alpha,
            beta_virtuous = self.beta_virtuous,
            beta_rogue = self.beta_rogue,
            voting = ?self.voting,
            %last_accepted,
            height,
            "consensus engine started"
        );
        Ok(engine)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            alpha: default_alpha(),
            beta_virtuous: default_beta_virtuous(),
            beta_rogue: default_beta_rogue(),
            voting: VotingVariant::default(),
            decided_cache_capacity: default_decided_cache_capacity(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_consensus::ConsensusError;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.k, 20);
        assert_eq!(config.alpha, 15);
        assert_eq!(config.beta_virtuous, 15);
        assert_eq!(config.beta_rogue, 20);
        assert_eq!(config.voting, VotingVariant::Nnary);
        assert_eq!(config.decided_cache_capacity, 8192);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            alpha = 12
            voting = "tree"
            log_format = "json"
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.alpha, 12);
        assert_eq!(config.voting, VotingVariant::Tree);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.k, 20); // default
    }

    #[test]
    fn unknown_voting_variant_is_config_error() {
        let err = EngineConfig::from_toml_str(r#"voting = "dag""#).unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = EngineConfig::from_toml_file("/nonexistent/snowfall.toml");
        assert!(matches!(result, Err(NodeError::Io(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "k = 10\nalpha = 7\nbeta_virtuous = 4\nbeta_rogue = 6").unwrap();

        let config = EngineConfig::from_toml_file(file.path()).unwrap();
        let params = config.parameters().unwrap();
        assert_eq!(params.k, 10);
        assert_eq!(params.alpha, 7);
        assert_eq!(params.beta_virtuous, 4);
        assert_eq!(params.beta_rogue, 6);
    }

    #[test]
    fn out_of_range_alpha_is_rejected() {
        let config = EngineConfig {
            alpha: 21,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.parameters(),
            Err(NodeError::Consensus(ConsensusError::InvalidParameters(_)))
        ));
    }

    #[test]
    fn rogue_below_virtuous_is_rejected() {
        let config = EngineConfig {
            beta_rogue: 10,
            ..EngineConfig::default()
        };
        assert!(config.parameters().is_err());
    }
}
