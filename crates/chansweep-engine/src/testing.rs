//! In-memory `WorkspaceApi` that records every call.
//!
//! Used by this crate's tests and, through the `testing` feature, by the
//! gateway's router tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use chansweep_core::error::ApiError;
use chansweep_core::types::{Channel, ChannelKind, HistoryMessage};
use chansweep_core::WorkspaceApi;

/// One recorded collaborator call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ListChannels,
    RecentMessages(String),
    Members(String),
    IsAdmin(String),
    PostMessage(String, String),
    Archive(String),
    Leave(String),
}

impl Call {
    /// `true` for calls that change remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::PostMessage(..) | Call::Archive(_) | Call::Leave(_))
    }
}

/// Scripted workspace. Build it with the `with_*` methods.
#[derive(Default)]
pub struct FakeWorkspace {
    channels: Vec<Channel>,
    history: HashMap<String, Vec<HistoryMessage>>,
    members: HashMap<String, Vec<String>>,
    admins: HashSet<String>,
    /// `(method, id)` pairs that fail with a remote error.
    failures: HashSet<(&'static str, String)>,
    list_fails: bool,
    /// Added to every history fetch.
    history_delay: Option<Duration>,
    /// Added to every archive call.
    archive_delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a public channel with its history sample.
    pub fn with_channel(mut self, id: &str, name: &str, history: Vec<HistoryMessage>) -> Self {
        self.channels.push(Channel::new(id, name, ChannelKind::Public));
        self.history.insert(id.to_string(), history);
        self
    }

    pub fn with_members(mut self, channel_id: &str, members: &[&str]) -> Self {
        self.members.insert(
            channel_id.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn with_admin(mut self, user_id: &str) -> Self {
        self.admins.insert(user_id.to_string());
        self
    }

    /// Make `method` fail for `id` (channel or user id).
    pub fn failing(mut self, method: &'static str, id: &str) -> Self {
        self.failures.insert((method, id.to_string()));
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// Slow down every history fetch.
    pub fn with_history_delay(mut self, delay: Duration) -> Self {
        self.history_delay = Some(delay);
        self
    }

    /// Slow down every archive call.
    pub fn with_archive_delay(mut self, delay: Duration) -> Self {
        self.archive_delay = Some(delay);
        self
    }

    /// Snapshot of all recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded calls that change remote state.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, method: &'static str, id: &str) -> Result<(), ApiError> {
        if self.failures.contains(&(method, id.to_string())) {
            return Err(ApiError::Remote {
                method: method.to_string(),
                error: "fake_failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WorkspaceApi for FakeWorkspace {
    async fn list_channels(&self, kinds: &[ChannelKind]) -> Result<Vec<Channel>, ApiError> {
        self.record(Call::ListChannels);
        if self.list_fails {
            return Err(ApiError::Remote {
                method: "conversations.list".to_string(),
                error: "fake_failure".to_string(),
            });
        }
        Ok(self
            .channels
            .iter()
            .filter(|c| kinds.contains(&c.kind))
            .cloned()
            .collect())
    }

    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, ApiError> {
        self.record(Call::RecentMessages(channel_id.to_string()));
        if let Some(delay) = self.history_delay {
            tokio::time::sleep(delay).await;
        }
        self.check("conversations.history", channel_id)?;
        let history = self.history.get(channel_id).cloned().unwrap_or_default();
        Ok(history.into_iter().take(limit).collect())
    }

    async fn members(&self, channel_id: &str) -> Result<Vec<String>, ApiError> {
        self.record(Call::Members(channel_id.to_string()));
        self.check("conversations.members", channel_id)?;
        Ok(self.members.get(channel_id).cloned().unwrap_or_default())
    }

    async fn is_admin(&self, user_id: &str) -> Result<bool, ApiError> {
        self.record(Call::IsAdmin(user_id.to_string()));
        self.check("users.info", user_id)?;
        Ok(self.admins.contains(user_id))
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), ApiError> {
        self.record(Call::PostMessage(channel_id.to_string(), text.to_string()));
        self.check("chat.postMessage", channel_id)
    }

    async fn archive(&self, channel_id: &str) -> Result<(), ApiError> {
        if let Some(delay) = self.archive_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::Archive(channel_id.to_string()));
        self.check("conversations.archive", channel_id)
    }

    async fn leave(&self, channel_id: &str) -> Result<(), ApiError> {
        self.record(Call::Leave(channel_id.to_string()));
        self.check("conversations.leave", channel_id)
    }
}
