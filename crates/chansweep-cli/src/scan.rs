//! `chansweep scan`: run one sweep from the terminal.
//!
//! Same code path as the slash command, minus the HTTP layer and the
//! signature check.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use chansweep_core::config::load_config;
use chansweep_core::types::DispositionPolicy;
use chansweep_engine::Sweeper;
use chansweep_slack::SlackClient;

use crate::helpers;

pub async fn run(
    config_path: Option<&Path>,
    user: &str,
    dry_run: bool,
    policy: Option<DispositionPolicy>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path);
    if let Some(policy) = policy {
        config.sweep.policy = policy;
    }

    let user = user.trim();
    if user.is_empty() {
        bail!("--user must not be empty");
    }
    if config.slack.bot_token.is_empty() {
        bail!("Slack bot token is not set (SLACK_BOT_TOKEN or slack.botToken)");
    }

    let client = SlackClient::new(&config.slack).context("failed to build Slack client")?;
    let sweeper = Sweeper::new(Arc::new(client), config.sweep);

    let report = sweeper.run(user, dry_run).await.context("sweep failed")?;
    helpers::print_report(&report, json)
}
