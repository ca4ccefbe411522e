//! Shared CLI helpers: path expansion, banner, report printing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use chansweep_core::config::get_config_path;
use chansweep_engine::RunReport;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// The config file a command will read or write.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(get_config_path)
}

pub fn print_banner(mode: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🧹 Chansweep".cyan().bold(), version.dimmed());
    println!("  Mode: {mode}");
    println!();
}

/// Print a finished sweep, as text or JSON.
pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    println!();
    println!("{}", report.render());
    for failure in report.failures() {
        println!(
            "  {} {}: {}",
            "·".dimmed(),
            failure.channel.yellow(),
            failure.reason.dimmed()
        );
    }
    println!();
    Ok(())
}

/// `✓` or a red note, for status-style lines.
pub fn check_mark(ok: bool, missing: &str) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        missing.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/sweep/config.json");
        assert!(result.ends_with("sweep/config.json"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde("/etc/chansweep.json"), PathBuf::from("/etc/chansweep.json"));
        assert_eq!(expand_tilde("local.json"), PathBuf::from("local.json"));
    }

    #[test]
    fn resolve_config_path_prefers_explicit() {
        let explicit = Path::new("/tmp/custom.json");
        assert_eq!(resolve_config_path(Some(explicit)), explicit.to_path_buf());
        assert!(resolve_config_path(None).ends_with("config.json"));
    }
}
