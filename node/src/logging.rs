//! Structured logging for a process embedding the engine.
//!
//! `RUST_LOG` wins when set. Otherwise a bare level such as `"debug"` applies
//! to the snowfall crates only and everything else logs at `warn`; a full
//! directive list (anything containing `=` or `,`) is used as given.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::NodeError;

/// Crates whose events a bare level applies to.
const SNOWFALL_TARGETS: [&str; 2] = ["snowfall_consensus", "snowfall_node"];

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Coloured lines for a terminal.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// Expand a configured level into filter directives.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = String::from("warn");
    for target in SNOWFALL_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

fn build_filter(level: &str) -> Result<EnvFilter, NodeError> {
    let directives = filter_directives(level);
    EnvFilter::try_new(&directives)
        .map_err(|e| NodeError::Config(format!("invalid log level {directives:?}: {e}")))
}

/// Install the global tracing subscriber.
///
/// Fails if `level` does not parse or a global subscriber is already set.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), NodeError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(level)?,
    };

    let installed = match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init(),
    };
    installed.map_err(|e| NodeError::Config(format!("logging already initialised: {e}")))
}
