//! Disposition engine: what happens to a stale channel.
//!
//! | policy           | requester admin? | dry-run outcome | live action            | live outcome |
//! |------------------|------------------|-----------------|------------------------|--------------|
//! | archive_or_leave | yes              | `WouldArchive`  | post notice + archive  | `Archived`   |
//! | archive_or_leave | no               | `WouldLeave`    | leave                  | `Left`       |
//! | close            | any              | `WouldClose`    | post closing notice    | `Closed`     |
//!
//! Dry-run never touches remote state. A live outcome is only returned once
//! the mutating call has succeeded.

use tracing::{info, warn};

use chansweep_core::config::schema::SweepConfig;
use chansweep_core::error::ApiError;
use chansweep_core::types::{Channel, DispositionOutcome, DispositionPolicy};
use chansweep_core::WorkspaceApi;

/// The action chosen for one stale channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Archive,
    Leave,
    Close,
}

impl Disposition {
    /// Pick the action for a stale channel.
    ///
    /// `requester_is_admin` is only consulted by the archive-or-leave policy.
    pub fn decide(policy: DispositionPolicy, requester_is_admin: bool) -> Self {
        match policy {
            DispositionPolicy::ArchiveOrLeave if requester_is_admin => Disposition::Archive,
            DispositionPolicy::ArchiveOrLeave => Disposition::Leave,
            DispositionPolicy::Close => Disposition::Close,
        }
    }

    /// The dry-run outcome for this action.
    pub fn hypothetical(self, channel_name: &str) -> DispositionOutcome {
        let name = channel_name.to_string();
        match self {
            Disposition::Archive => DispositionOutcome::WouldArchive(name),
            Disposition::Leave => DispositionOutcome::WouldLeave(name),
            Disposition::Close => DispositionOutcome::WouldClose(name),
        }
    }
}

/// Message templates posted to channels before they go away.
///
/// `{channel}` in a template expands to the channel id.
#[derive(Clone, Debug)]
pub struct Notices {
    pub archive: String,
    /// `None` when the close policy should not post anything.
    pub close: Option<String>,
}

impl Notices {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            archive: config.archive_notice.clone(),
            close: config
                .notify_on_close
                .then(|| config.close_notice.clone()),
        }
    }

    fn render(template: &str, channel: &Channel) -> String {
        template.replace("{channel}", &channel.id)
    }
}

/// Carry out `disposition` on `channel`, or only report it when `dry_run`.
pub async fn apply(
    api: &dyn WorkspaceApi,
    channel: &Channel,
    disposition: Disposition,
    dry_run: bool,
    notices: &Notices,
) -> Result<DispositionOutcome, ApiError> {
    if dry_run {
        return Ok(disposition.hypothetical(&channel.name));
    }

    let name = channel.name.clone();
    let outcome = match disposition {
        Disposition::Archive => {
            let text = Notices::render(&notices.archive, channel);
            if let Err(e) = api.post_message(&channel.id, &text).await {
                warn!(channel = %channel.id, error = %e, "archive notice failed, archiving anyway");
            }
            api.archive(&channel.id).await?;
            DispositionOutcome::Archived(name)
        }
        Disposition::Leave => {
            api.leave(&channel.id).await?;
            DispositionOutcome::Left(name)
        }
        Disposition::Close => {
            if let Some(template) = &notices.close {
                let text = Notices::render(template, channel);
                api.post_message(&channel.id, &text).await?;
            }
            DispositionOutcome::Closed(name)
        }
    };

    info!(channel = %channel.id, ?outcome, "disposition applied");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeWorkspace};
    use chansweep_core::types::ChannelKind;

    fn channel() -> Channel {
        Channel::new("C1", "old-project", ChannelKind::Public)
    }

    fn notices() -> Notices {
        Notices::from_config(&SweepConfig::default())
    }

    #[test]
    fn test_decide_table() {
        use DispositionPolicy::*;
        assert_eq!(Disposition::decide(ArchiveOrLeave, true), Disposition::Archive);
        assert_eq!(Disposition::decide(ArchiveOrLeave, false), Disposition::Leave);
        assert_eq!(Disposition::decide(Close, true), Disposition::Close);
        assert_eq!(Disposition::decide(Close, false), Disposition::Close);
    }

    #[test]
    fn test_notices_respect_notify_flag() {
        let config = SweepConfig {
            notify_on_close: false,
            ..Default::default()
        };
        assert!(Notices::from_config(&config).close.is_none());
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_calls() {
        let api = FakeWorkspace::new();
        for (disposition, expected) in [
            (Disposition::Archive, DispositionOutcome::WouldArchive("old-project".into())),
            (Disposition::Leave, DispositionOutcome::WouldLeave("old-project".into())),
            (Disposition::Close, DispositionOutcome::WouldClose("old-project".into())),
        ] {
            let outcome = apply(&api, &channel(), disposition, true, &notices())
                .await
                .unwrap();
            assert_eq!(outcome, expected);
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_live_archive_posts_notice_then_archives() {
        let api = FakeWorkspace::new();
        let outcome = apply(&api, &channel(), Disposition::Archive, false, &notices())
            .await
            .unwrap();

        assert_eq!(outcome, DispositionOutcome::Archived("old-project".into()));
        assert_eq!(
            api.calls(),
            vec![
                Call::PostMessage(
                    "C1".into(),
                    "Archiving this channel <#C1> due to inactivity.".into()
                ),
                Call::Archive("C1".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_archive_notice_failure_still_archives() {
        let api = FakeWorkspace::new().failing("chat.postMessage", "C1");
        let outcome = apply(&api, &channel(), Disposition::Archive, false, &notices())
            .await
            .unwrap();
        assert_eq!(outcome, DispositionOutcome::Archived("old-project".into()));
        assert!(api.calls().contains(&Call::Archive("C1".into())));
    }

    #[tokio::test]
    async fn test_archive_failure_is_error() {
        let api = FakeWorkspace::new().failing("conversations.archive", "C1");
        let err = apply(&api, &channel(), Disposition::Archive, false, &notices())
            .await
            .unwrap_err();
        assert_eq!(err.method(), "conversations.archive");
    }

    #[tokio::test]
    async fn test_live_leave() {
        let api = FakeWorkspace::new();
        let outcome = apply(&api, &channel(), Disposition::Leave, false, &notices())
            .await
            .unwrap();
        assert_eq!(outcome, DispositionOutcome::Left("old-project".into()));
        assert_eq!(api.calls(), vec![Call::Leave("C1".into())]);
    }

    #[tokio::test]
    async fn test_live_close_posts_closing_notice() {
        let api = FakeWorkspace::new();
        let outcome = apply(&api, &channel(), Disposition::Close, false, &notices())
            .await
            .unwrap();
        assert_eq!(outcome, DispositionOutcome::Closed("old-project".into()));
        assert_eq!(
            api.calls(),
            vec![Call::PostMessage(
                "C1".into(),
                "Closing this channel <#C1> due to inactivity.".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_live_close_without_notice() {
        let api = FakeWorkspace::new();
        let quiet = Notices {
            archive: String::new(),
            close: None,
        };
        let outcome = apply(&api, &channel(), Disposition::Close, false, &quiet)
            .await
            .unwrap();
        assert_eq!(outcome, DispositionOutcome::Closed("old-project".into()));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_close_notice_failure_is_error() {
        let api = FakeWorkspace::new().failing("chat.postMessage", "C1");
        let result = apply(&api, &channel(), Disposition::Close, false, &notices()).await;
        assert!(result.is_err());
    }
}
