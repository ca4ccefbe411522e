//! `chansweep serve`: run the slash-command gateway.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Build the Slack client once (shared by every request)
//! 3. Build the sweeper around it
//! 4. Serve until Ctrl+C

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use chansweep_core::config::load_config;
use chansweep_engine::Sweeper;
use chansweep_gateway::{serve, AppState};
use chansweep_slack::SlackClient;

use crate::helpers;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);

    if config.slack.bot_token.is_empty() {
        bail!("Slack bot token is not set (SLACK_BOT_TOKEN or slack.botToken)");
    }
    if config.slack.signing_secret.is_empty() {
        bail!("Slack signing secret is not set (SLACK_SIGNING_SECRET or slack.signingSecret)");
    }

    let client = SlackClient::new(&config.slack).context("failed to build Slack client")?;
    let sweeper = Arc::new(Sweeper::new(Arc::new(client), config.sweep.clone()));

    helpers::print_banner("Gateway");
    println!(
        "  Listening on http://{}:{}{}",
        config.gateway.host, config.gateway.port, config.gateway.path
    );
    println!("  Policy: {}", sweeper.policy());
    println!();

    info!(policy = %sweeper.policy(), "starting gateway");
    serve(AppState::new(sweeper, &config.slack.signing_secret), &config.gateway).await
}
