//! Plumbing for embedding the consensus engine in a node.
//!
//! The engine itself is a synchronous library; this crate supplies what a
//! host process wraps around it:
//! - TOML configuration of engine parameters and logging
//! - `tracing` subscriber setup
//! - a lock-guarded handle sharing one engine between threads

pub mod config;
pub mod error;
pub mod logging;
pub mod shared;

pub use config::EngineConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use shared::SharedEngine;
