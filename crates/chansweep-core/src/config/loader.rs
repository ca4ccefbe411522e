//! Config loader: reads `~/.chansweep/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.chansweep/config.json`
//! 3. Conventional deployment vars: `SLACK_BOT_TOKEN`, `SLACK_SIGNING_SECRET`, `PORT`
//! 4. Environment variables `CHANSWEEP_<SECTION>__<FIELD>` (override everything)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    apply_env_overrides(read_config_file(path))
}

fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `SLACK_BOT_TOKEN`, `CHANSWEEP_SLACK__BOT_TOKEN` → `slack.bot_token`
/// - `SLACK_SIGNING_SECRET`, `CHANSWEEP_SLACK__SIGNING_SECRET` → `slack.signing_secret`
/// - `CHANSWEEP_SLACK__API_BASE` → `slack.api_base`
/// - `PORT`, `CHANSWEEP_GATEWAY__PORT` → `gateway.port`
/// - `CHANSWEEP_GATEWAY__HOST` → `gateway.host`
/// - `CHANSWEEP_GATEWAY__PATH` → `gateway.path`
/// - `CHANSWEEP_SWEEP__POLICY` → `sweep.policy`
/// - `CHANSWEEP_SWEEP__INACTIVITY_DAYS` → `sweep.inactivity_days`
/// - `CHANSWEEP_SWEEP__HISTORY_LIMIT` → `sweep.history_limit`
/// - `CHANSWEEP_SWEEP__CONCURRENCY` → `sweep.concurrency`
/// - `CHANSWEEP_SWEEP__RUN_TIMEOUT_SECS` → `sweep.run_timeout_secs`
fn apply_env_overrides(mut config: Config) -> Config {
    // Conventional names first so the namespaced ones win.
    if let Ok(val) = std::env::var("SLACK_BOT_TOKEN") {
        config.slack.bot_token = val;
    }
    if let Ok(val) = std::env::var("SLACK_SIGNING_SECRET") {
        config.slack.signing_secret = val;
    }
    set_parsed("PORT", &mut config.gateway.port);

    // Slack
    if let Ok(val) = std::env::var("CHANSWEEP_SLACK__BOT_TOKEN") {
        config.slack.bot_token = val;
    }
    if let Ok(val) = std::env::var("CHANSWEEP_SLACK__SIGNING_SECRET") {
        config.slack.signing_secret = val;
    }
    if let Ok(val) = std::env::var("CHANSWEEP_SLACK__API_BASE") {
        config.slack.api_base = val;
    }

    // Gateway
    if let Ok(val) = std::env::var("CHANSWEEP_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    set_parsed("CHANSWEEP_GATEWAY__PORT", &mut config.gateway.port);
    if let Ok(val) = std::env::var("CHANSWEEP_GATEWAY__PATH") {
        config.gateway.path = val;
    }

    // Sweep
    set_parsed("CHANSWEEP_SWEEP__POLICY", &mut config.sweep.policy);
    set_parsed("CHANSWEEP_SWEEP__INACTIVITY_DAYS", &mut config.sweep.inactivity_days);
    set_parsed("CHANSWEEP_SWEEP__HISTORY_LIMIT", &mut config.sweep.history_limit);
    set_parsed("CHANSWEEP_SWEEP__CONCURRENCY", &mut config.sweep.concurrency);
    set_parsed("CHANSWEEP_SWEEP__RUN_TIMEOUT_SECS", &mut config.sweep.run_timeout_secs);

    config
}

/// Overwrite `slot` with the parsed value of `var`, keeping it on parse failure.
fn set_parsed<T: FromStr>(var: &str, slot: &mut T) {
    if let Ok(val) = std::env::var(var) {
        match val.parse::<T>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => warn!("Ignoring {var}: cannot parse {val:?}"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
