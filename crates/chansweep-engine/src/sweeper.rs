//! Sweeper: one scan over every channel in the workspace.
//!
//! Flow per run:
//! 1. List public and private channels (the only failure that aborts a run)
//! 2. For each channel: sample history → classify → resolve role → dispose
//! 3. Append each result to the report as it arrives
//!
//! Channels are processed with bounded concurrency, but results are consumed
//! in listing order, so the report order matches the channel listing. A
//! remote failure on one channel is recorded and the scan moves on.
//!
//! The run deadline only bounds the read phase. A channel whose read phase
//! has not finished by then is reported as unchecked and sees no mutation;
//! a disposition that has started always runs to completion.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use chansweep_core::config::schema::SweepConfig;
use chansweep_core::error::{ApiError, SweepError};
use chansweep_core::types::{Channel, ChannelKind, DispositionOutcome, DispositionPolicy};
use chansweep_core::utils::{inactivity_cutoff, unix_now};
use chansweep_core::WorkspaceApi;

use crate::classifier;
use crate::disposition::{self, Disposition, Notices};
use crate::report::RunReport;
use crate::roles;

/// What became of one channel.
enum ChannelRun {
    /// `Ok(None)` means the channel is not stale.
    Finished(Result<Option<DispositionOutcome>, ApiError>),
    /// The deadline passed before a disposition was started.
    Unchecked,
}

/// Drives sweeps against one workspace backend.
///
/// Holds no per-run state; every `run` builds its report from scratch.
pub struct Sweeper {
    api: Arc<dyn WorkspaceApi>,
    config: SweepConfig,
    notices: Notices,
}

impl Sweeper {
    pub fn new(api: Arc<dyn WorkspaceApi>, config: SweepConfig) -> Self {
        let notices = Notices::from_config(&config);
        Self {
            api,
            config,
            notices,
        }
    }

    pub fn policy(&self) -> DispositionPolicy {
        self.config.policy
    }

    fn run_timeout(&self) -> Option<Duration> {
        let secs = self.config.run_timeout_secs;
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Sweep the workspace on behalf of `requester`.
    pub async fn run(&self, requester: &str, dry_run: bool) -> Result<RunReport, SweepError> {
        self.run_at(requester, dry_run, unix_now()).await
    }

    /// Like [`run`](Self::run), with an explicit "now" (epoch seconds).
    pub async fn run_at(
        &self,
        requester: &str,
        dry_run: bool,
        now: f64,
    ) -> Result<RunReport, SweepError> {
        let cutoff = inactivity_cutoff(now, self.config.inactivity_days);
        let deadline = self.run_timeout().map(|t| Instant::now() + t);

        let channels = self
            .api
            .list_channels(&ChannelKind::ALL)
            .await
            .map_err(SweepError::ListChannels)?;

        info!(
            requester = %requester,
            channels = channels.len(),
            policy = %self.config.policy,
            dry_run,
            "starting sweep"
        );

        let mut report = RunReport::new(self.config.policy, dry_run);
        let mut unchecked = 0usize;

        let mut results = stream::iter(channels)
            .map(|channel: Channel| async move {
                let run = self
                    .process_channel(&channel, requester, cutoff, dry_run, deadline)
                    .await;
                (channel, run)
            })
            .buffered(self.config.concurrency.max(1));

        while let Some((channel, run)) = results.next().await {
            match run {
                ChannelRun::Finished(Ok(Some(outcome))) => report.record(outcome),
                ChannelRun::Finished(Ok(None)) => {}
                ChannelRun::Finished(Err(e)) => {
                    warn!(channel = %channel.id, error = %e, "skipping channel after remote error");
                    report.record_failure(channel.name, e.to_string());
                }
                ChannelRun::Unchecked => unchecked += 1,
            }
        }

        if unchecked > 0 {
            warn!(unchecked, "sweep deadline reached, returning partial report");
            report.mark_unchecked(unchecked);
        }

        info!(
            outcomes = report.outcomes().len(),
            failures = report.failures().len(),
            "sweep finished"
        );
        Ok(report)
    }

    /// Classify one channel and, when stale, apply its disposition.
    ///
    /// The read phase (history sample and role lookups) is cut off at
    /// `deadline`; the disposition is not.
    async fn process_channel(
        &self,
        channel: &Channel,
        requester: &str,
        cutoff: f64,
        dry_run: bool,
        deadline: Option<Instant>,
    ) -> ChannelRun {
        let decision = match deadline {
            Some(deadline) if Instant::now() >= deadline => return ChannelRun::Unchecked,
            Some(deadline) => {
                match tokio::time::timeout_at(deadline, self.decide(channel, requester, cutoff))
                    .await
                {
                    Ok(decision) => decision,
                    Err(_) => return ChannelRun::Unchecked,
                }
            }
            None => self.decide(channel, requester, cutoff).await,
        };

        let disposition = match decision {
            Ok(Some(disposition)) => disposition,
            Ok(None) => return ChannelRun::Finished(Ok(None)),
            Err(e) => return ChannelRun::Finished(Err(e)),
        };

        ChannelRun::Finished(
            disposition::apply(self.api.as_ref(), channel, disposition, dry_run, &self.notices)
                .await
                .map(Some),
        )
    }

    /// Read phase: `None` when the channel is not stale.
    async fn decide(
        &self,
        channel: &Channel,
        requester: &str,
        cutoff: f64,
    ) -> Result<Option<Disposition>, ApiError> {
        let api = self.api.as_ref();

        let messages = api
            .recent_messages(&channel.id, self.config.history_limit)
            .await?;

        if !classifier::is_stale(&messages, requester, cutoff, self.config.staleness_rule) {
            debug!(channel = %channel.id, sampled = messages.len(), "channel is active");
            return Ok(None);
        }

        let disposition = match self.config.policy {
            DispositionPolicy::ArchiveOrLeave => {
                let is_admin = roles::requester_is_channel_admin(
                    api,
                    &channel.id,
                    requester,
                    self.config.admin_lookup_concurrency,
                )
                .await?;
                Disposition::decide(self.config.policy, is_admin)
            }
            DispositionPolicy::Close => Disposition::decide(self.config.policy, false),
        };

        debug!(channel = %channel.id, ?disposition, "channel is stale");
        Ok(Some(disposition))
    }
}
