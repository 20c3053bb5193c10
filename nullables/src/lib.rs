//! Nullable infrastructure for deterministic testing.
//!
//! Everything the engine touches from the outside (time, blocks, decision
//! callbacks) has a test-friendly stand-in here that:
//! - returns deterministic values
//! - can be controlled programmatically
//! - records what the engine did to it
//!
//! Usage: build chains with [`ChainBuilder`], hand the engine a
//! [`RecordingListener`], then assert on the recorded decisions.

pub mod block;
pub mod chain;
pub mod clock;
pub mod listener;

pub use block::NullBlock;
pub use chain::ChainBuilder;
pub use clock::NullClock;
pub use listener::{Decision, RecordingListener};
