//! Workspace API trait: the capability boundary between the sweep engine
//! and the remote chat workspace.
//!
//! The Slack Web API client in `chansweep-slack` is the production
//! implementation; tests use in-memory fakes.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{Channel, ChannelKind, HistoryMessage};

/// Every remote workspace backend implements this trait.
///
/// Read calls (`list_channels`, `recent_messages`, `members`, `is_admin`)
/// never mutate remote state. Mutating calls (`post_message`, `archive`,
/// `leave`) are only issued by live (non-dry-run) sweeps.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// List channels of the given kinds, in the order the remote returns them.
    async fn list_channels(&self, kinds: &[ChannelKind]) -> Result<Vec<Channel>, ApiError>;

    /// Fetch at most `limit` of the most recent messages in a channel.
    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, ApiError>;

    /// Member ids of a channel.
    async fn members(&self, channel_id: &str) -> Result<Vec<String>, ApiError>;

    /// Whether a user is a workspace admin.
    async fn is_admin(&self, user_id: &str) -> Result<bool, ApiError>;

    /// Post a plain text message to a channel.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), ApiError>;

    /// Archive a channel.
    async fn archive(&self, channel_id: &str) -> Result<(), ApiError>;

    /// Make the bot identity leave a channel.
    async fn leave(&self, channel_id: &str) -> Result<(), ApiError>;
}
