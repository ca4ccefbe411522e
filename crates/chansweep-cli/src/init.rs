//! `chansweep init`: write a default config file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use chansweep_core::config::{save_config, Config};

use crate::helpers::resolve_config_path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🧹 Chansweep — Setup".cyan().bold());
    println!();

    let path = resolve_config_path(config_path);
    if write_default_config(&path)? {
        println!("  {} created config at {}", "✓".green(), path.display());
    } else {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    }

    println!();
    println!(
        "{}",
        "  Next: set slack.botToken and slack.signingSecret (or SLACK_BOT_TOKEN / SLACK_SIGNING_SECRET), then run `chansweep serve`."
            .green()
    );
    println!();
    Ok(())
}

/// Write defaults to `path` unless a file is already there. Returns whether
/// a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_port(path: &Path) -> u16 {
        let content = std::fs::read_to_string(path).unwrap();
        serde_json::from_str::<Config>(&content).unwrap().gateway.port
    }

    #[test]
    fn writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());
        assert!(path.exists());
        assert_eq!(read_port(&path), 3010);

        std::fs::write(&path, r#"{"gateway":{"port":4000}}"#).unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(read_port(&path), 4000);
    }
}
