//! Chansweep Gateway: the HTTP surface the slash command talks to.
//!
//! - **signature**: Slack request signing check
//! - **server**: axum router, handlers, and the listener

pub mod server;
pub mod signature;

pub use server::{build_router, serve, AppState};
pub use signature::SignatureError;
