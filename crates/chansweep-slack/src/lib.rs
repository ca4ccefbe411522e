//! Chansweep Slack: the Slack Web API implementation of `WorkspaceApi`.
//!
//! Talks to the REST endpoints directly with `reqwest`; no SDK.

pub mod client;

pub use client::SlackClient;
