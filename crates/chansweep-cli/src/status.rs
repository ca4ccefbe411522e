//! `chansweep status`: show configuration status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chansweep_core::config::load_config;

use crate::helpers::{check_mark, resolve_config_path};

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = resolve_config_path(config_path);

    println!();
    println!("{}", "🧹 Chansweep Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        check_mark(path.exists(), "(not found, using defaults)")
    );

    // Slack
    println!();
    println!("  {}", "Slack:".bold());
    println!(
        "    {:<20} {}",
        "Bot token",
        check_mark(!config.slack.bot_token.is_empty(), "· not set")
    );
    println!(
        "    {:<20} {}",
        "Signing secret",
        check_mark(!config.slack.signing_secret.is_empty(), "· not set")
    );
    println!("    {:<20} {}", "API base", config.slack.api_base.dimmed());

    // Gateway
    println!();
    println!(
        "  {:<18} {}:{}{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port,
        config.gateway.path
    );

    // Sweep
    let sweep = &config.sweep;
    println!();
    println!("  {}", "Sweep:".bold());
    println!("    {:<20} {}", "Policy", sweep.policy);
    println!("    {:<20} {:?}", "Staleness rule", sweep.staleness_rule);
    println!("    {:<20} {} days", "Inactivity", sweep.inactivity_days);
    println!("    {:<20} {} messages", "History sample", sweep.history_limit);
    println!("    {:<20} {}", "Concurrency", sweep.concurrency);
    let timeout = if sweep.run_timeout_secs == 0 {
        "none".to_string()
    } else {
        format!("{}s", sweep.run_timeout_secs)
    };
    println!("    {:<20} {}", "Run time limit", timeout);

    println!();
    if !config.slack.is_configured() {
        println!(
            "  {}",
            "Set SLACK_BOT_TOKEN and SLACK_SIGNING_SECRET before running `chansweep serve`.".yellow()
        );
        println!();
    }

    Ok(())
}
