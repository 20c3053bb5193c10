//! Fundamental types for the snowfall consensus engine.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: block and validator identities, timestamps, and block status.

pub mod block;
pub mod node;
pub mod status;
pub mod time;

pub use block::BlockId;
pub use node::NodeId;
pub use status::Status;
pub use time::Timestamp;
