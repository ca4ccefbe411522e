//! Chansweep Core: shared types, the workspace API seam, config, and utilities.
//!
//! This crate provides:
//! - **types**: channels, history messages, disposition outcomes
//! - **api**: the `WorkspaceApi` trait every remote workspace backend implements
//! - **error**: `ApiError` and `SweepError`
//! - **config**: JSON config schema + loader with env overrides
//! - **utils**: data paths and epoch-time helpers

pub mod api;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use api::WorkspaceApi;
pub use error::{ApiError, SweepError};
pub use types::{
    Channel, ChannelKind, DispositionOutcome, DispositionPolicy, HistoryMessage, StalenessRule,
};
