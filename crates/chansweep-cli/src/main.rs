//! Chansweep CLI: entry point.
//!
//! # Commands
//!
//! - `chansweep serve [--logs]`: run the slash-command gateway
//! - `chansweep scan --user U… [--dry-run] [--policy P] [--json]`: one sweep from the terminal
//! - `chansweep status`: show configuration status
//! - `chansweep init`: write a default config file

mod helpers;
mod init;
mod scan;
mod serve;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chansweep_core::types::DispositionPolicy;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🧹 Chansweep: archive or leave Slack channels nobody uses anymore
#[derive(Parser)]
#[command(name = "chansweep", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.chansweep/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway the slash command posts to
    Serve {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Run one sweep on behalf of a user and print the report
    Scan {
        /// Slack user id of the requester (e.g. U012ABCDEF)
        #[arg(short, long)]
        user: String,

        /// Report what would happen without changing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Override the configured policy (archive_or_leave | close)
        #[arg(long)]
        policy: Option<DispositionPolicy>,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration status
    Status,

    /// Write a default config file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config_path: Option<PathBuf> = cli.config.as_deref().map(helpers::expand_tilde);
    let config_path = config_path.as_deref();

    match cli.command {
        Commands::Serve { logs } => {
            init_logging(logs, "info");
            serve::run(config_path).await
        }
        Commands::Scan {
            user,
            dry_run,
            policy,
            json,
            logs,
        } => {
            init_logging(logs, "warn");
            scan::run(config_path, &user, dry_run, policy, json).await
        }
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

/// Initialize tracing/logging.
///
/// `--logs` wins; otherwise `RUST_LOG`, otherwise `default`.
fn init_logging(verbose: bool, default: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chansweep=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
