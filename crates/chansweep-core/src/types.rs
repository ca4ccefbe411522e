//! Core domain types: snapshots of remote workspace state plus the
//! per-channel outcomes a sweep produces.
//!
//! Everything here is a read-only snapshot taken for one invocation. Nothing
//! is persisted between sweeps.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────
// Channels and messages
// ─────────────────────────────────────────────

/// Visibility of a workspace channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Public,
    Private,
}

impl ChannelKind {
    /// Both kinds, in the order a sweep asks for them.
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Public, ChannelKind::Private];

    /// Slack's `types` parameter value for this kind.
    pub fn as_slack_type(&self) -> &'static str {
        match self {
            ChannelKind::Public => "public_channel",
            ChannelKind::Private => "private_channel",
        }
    }
}

/// A channel as returned by the channel-listing call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Opaque channel identifier (e.g. `"C0123ABC"`).
    pub id: String,
    /// Display name without the leading `#`.
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// One message from a channel's recent history window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub channel_id: String,
    /// Seconds since the Unix epoch, fractional.
    pub ts: f64,
    /// Author id. System messages (joins, topic changes, …) may have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl HistoryMessage {
    pub fn new(channel_id: impl Into<String>, ts: f64, user: Option<&str>) -> Self {
        Self {
            channel_id: channel_id.into(),
            ts,
            user: user.map(String::from),
        }
    }

    /// `true` unless this message was written by `requester`.
    ///
    /// A message without an author never matches the requester.
    pub fn is_by_other_than(&self, requester: &str) -> bool {
        self.user.as_deref() != Some(requester)
    }
}

// ─────────────────────────────────────────────
// Policies
// ─────────────────────────────────────────────

/// How a stale channel is disposed of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionPolicy {
    /// Archive when the requester is a channel admin, otherwise leave.
    #[default]
    ArchiveOrLeave,
    /// Flag the channel and optionally post a closing notice.
    Close,
}

impl DispositionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispositionPolicy::ArchiveOrLeave => "archive_or_leave",
            DispositionPolicy::Close => "close",
        }
    }
}

impl fmt::Display for DispositionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DispositionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "archive_or_leave" | "archive" => Ok(DispositionPolicy::ArchiveOrLeave),
            "close" => Ok(DispositionPolicy::Close),
            other => Err(format!("unknown disposition policy: {other}")),
        }
    }
}

/// Which history shape marks a channel as stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessRule {
    /// Stale if any sampled message is old and not written by the requester,
    /// regardless of newer activity in the same sample.
    #[default]
    AnyOld,
    /// Stale only if there is non-requester activity in the sample and all of
    /// it is older than the cutoff.
    NoRecentActivity,
}

// ─────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────

/// What happened (or would have happened) to one stale channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "channel", rename_all = "snake_case")]
pub enum DispositionOutcome {
    Archived(String),
    Left(String),
    Closed(String),
    WouldArchive(String),
    WouldLeave(String),
    WouldClose(String),
}

impl DispositionOutcome {
    /// The channel name this outcome is about.
    pub fn channel_name(&self) -> &str {
        match self {
            DispositionOutcome::Archived(n)
            | DispositionOutcome::Left(n)
            | DispositionOutcome::Closed(n)
            | DispositionOutcome::WouldArchive(n)
            | DispositionOutcome::WouldLeave(n)
            | DispositionOutcome::WouldClose(n) => n,
        }
    }

    /// `true` for the hypothetical (dry-run) variants.
    pub fn is_hypothetical(&self) -> bool {
        matches!(
            self,
            DispositionOutcome::WouldArchive(_)
                | DispositionOutcome::WouldLeave(_)
                | DispositionOutcome::WouldClose(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_without_author_is_never_requester() {
        let msg = HistoryMessage::new("C1", 1.0, None);
        assert!(msg.is_by_other_than("U1"));
    }

    #[test]
    fn test_message_by_requester() {
        let msg = HistoryMessage::new("C1", 1.0, Some("U1"));
        assert!(!msg.is_by_other_than("U1"));
        assert!(msg.is_by_other_than("U2"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("close".parse::<DispositionPolicy>(), Ok(DispositionPolicy::Close));
        assert_eq!(
            "Archive-Or-Leave".parse::<DispositionPolicy>(),
            Ok(DispositionPolicy::ArchiveOrLeave)
        );
        assert!("delete".parse::<DispositionPolicy>().is_err());
    }

    #[test]
    fn test_policy_serde_snake_case() {
        let json = serde_json::to_string(&DispositionPolicy::ArchiveOrLeave).unwrap();
        assert_eq!(json, "\"archive_or_leave\"");
        let rule: StalenessRule = serde_json::from_str("\"no_recent_activity\"").unwrap();
        assert_eq!(rule, StalenessRule::NoRecentActivity);
    }

    #[test]
    fn test_outcome_channel_name() {
        let outcome = DispositionOutcome::WouldLeave("random".into());
        assert_eq!(outcome.channel_name(), "random");
        assert!(outcome.is_hypothetical());
        assert!(!DispositionOutcome::Archived("x".into()).is_hypothetical());
    }

    #[test]
    fn test_outcome_serialize_tagged() {
        let json = serde_json::to_value(DispositionOutcome::Closed("old".into())).unwrap();
        assert_eq!(json["outcome"], "closed");
        assert_eq!(json["channel"], "old");
    }

    #[test]
    fn test_slack_types() {
        let types: Vec<_> = ChannelKind::ALL.iter().map(|k| k.as_slack_type()).collect();
        assert_eq!(types, vec!["public_channel", "private_channel"]);
    }
}
