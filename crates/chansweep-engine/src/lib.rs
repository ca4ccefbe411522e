//! Chansweep Engine: decides which channels are stale and what to do about them.
//!
//! This crate provides:
//! - **classifier**: the staleness rule over a channel's recent history
//! - **roles**: whether the requester is an admin member of a channel
//! - **disposition**: maps a stale channel to archive / leave / close and runs it
//! - **report**: accumulates outcomes and renders the text summary
//! - **command**: parses slash-command text
//! - **sweeper**: drives one scan over every channel

pub mod classifier;
pub mod command;
pub mod disposition;
pub mod report;
pub mod roles;
pub mod sweeper;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use command::SweepCommand;
pub use disposition::Disposition;
pub use report::{ChannelFailure, RunReport};
pub use sweeper::Sweeper;
