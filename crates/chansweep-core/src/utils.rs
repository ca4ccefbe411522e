//! Utility helpers: data paths and epoch-time arithmetic.

use std::path::PathBuf;

/// Seconds in one day.
pub const SECS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Get the Chansweep data directory (e.g. `~/.chansweep/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".chansweep")
}

/// Current time as fractional seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Cutoff timestamp `days` before `now`. Messages older than this are "old".
pub fn inactivity_cutoff(now: f64, days: u32) -> f64 {
    now - f64::from(days) * SECS_PER_DAY
}

/// Parse a Slack-style `"1700000000.000100"` timestamp.
pub fn parse_ts(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|ts| ts.is_finite())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}
