//! Configuration schema.
//!
//! Hierarchy: `Config` → `SlackConfig`, `GatewayConfig`, `SweepConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

use crate::types::{DispositionPolicy, StalenessRule};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.chansweep/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub slack: SlackConfig,
    pub gateway: GatewayConfig,
    pub sweep: SweepConfig,
}

// ─────────────────────────────────────────────
// Slack
// ─────────────────────────────────────────────

/// Slack credentials and Web API client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`). Required.
    pub bot_token: String,
    /// Signing secret used to verify inbound slash-command requests.
    pub signing_secret: String,
    /// Web API base URL. Overridden in tests.
    pub api_base: String,
    /// Retries for rate-limited calls before giving up.
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            signing_secret: String::new(),
            api_base: "https://slack.com/api".to_string(),
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

impl SlackConfig {
    /// Both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.signing_secret.is_empty()
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Route the slash command posts to.
    pub path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3010,
            path: "/clean-old".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Sweep
// ─────────────────────────────────────────────

/// Staleness and disposition settings for a sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SweepConfig {
    /// What to do with stale channels.
    pub policy: DispositionPolicy,
    /// Messages older than this many days count as old.
    pub inactivity_days: u32,
    /// How many recent messages to sample per channel.
    pub history_limit: usize,
    pub staleness_rule: StalenessRule,
    /// Channels processed at once.
    pub concurrency: usize,
    /// Admin lookups in flight at once while resolving one channel's members.
    pub admin_lookup_concurrency: usize,
    /// Wall-clock budget for one sweep. `0` disables the limit.
    pub run_timeout_secs: u64,
    /// Posted before archiving. `{channel}` expands to the channel id.
    pub archive_notice: String,
    /// Posted when closing. `{channel}` expands to the channel id.
    pub close_notice: String,
    /// Whether the close policy posts `close_notice` at all.
    pub notify_on_close: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            policy: DispositionPolicy::default(),
            inactivity_days: 365,
            history_limit: 100,
            staleness_rule: StalenessRule::default(),
            concurrency: 4,
            admin_lookup_concurrency: 8,
            run_timeout_secs: 120,
            archive_notice: "Archiving this channel <#{channel}> due to inactivity.".to_string(),
            close_notice: "Closing this channel <#{channel}> due to inactivity.".to_string(),
            notify_on_close: true,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway.port, 3010);
        assert_eq!(config.gateway.path, "/clean-old");
        assert_eq!(config.sweep.inactivity_days, 365);
        assert_eq!(config.sweep.history_limit, 100);
        assert_eq!(config.sweep.policy, DispositionPolicy::ArchiveOrLeave);
        assert_eq!(config.sweep.staleness_rule, StalenessRule::AnyOld);
        assert!(!config.slack.is_configured());
    }

    #[test]
    fn test_config_json_uses_camel_case() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json["slack"].get("botToken").is_some());
        assert!(json["sweep"].get("inactivityDays").is_some());
        assert!(json["sweep"].get("runTimeoutSecs").is_some());
        assert!(json["sweep"].get("inactivity_days").is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = serde_json::json!({
            "sweep": {
                "policy": "close",
                "historyLimit": 20
            }
        });

        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.sweep.policy, DispositionPolicy::Close);
        assert_eq!(config.sweep.history_limit, 20);
        assert_eq!(config.sweep.inactivity_days, 365);
        assert!(config.sweep.notify_on_close);
        assert_eq!(config.slack.api_base, "https://slack.com/api");
    }

    #[test]
    fn test_slack_is_configured() {
        let slack = SlackConfig {
            bot_token: "xoxb-1".into(),
            signing_secret: "shh".into(),
            ..Default::default()
        };
        assert!(slack.is_configured());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.slack.max_retries, 3);
    }
}
