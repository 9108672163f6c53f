// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialdesk - call-center CRM core.
//!
//! This is the binary entry point: it serves the HTTP gateway, seeds demo
//! data, and prints dashboard statistics from the persisted store.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod runtime;
mod seed;
mod serve;
mod shutdown;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialdesk_config::DialdeskConfig;

/// Dialdesk - call-center CRM core.
#[derive(Parser, Debug)]
#[command(name = "dialdesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Populate an empty store with demo team members, clients, and calls.
    Seed,
    /// Print dashboard statistics and team performance.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            dialdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Seed) => seed::run_seed(config).await,
        Some(Commands::Stats { json }) => stats::run_stats(config, json).await,
        None => {
            println!("dialdesk: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("dialdesk: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<DialdeskConfig, Vec<dialdesk_config::ConfigError>> {
    match path {
        Some(path) => dialdesk_config::load_and_validate_path(path),
        None => dialdesk_config::load_and_validate(),
    }
}

/// Logs go to stderr so `stats --json` stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dialdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn stats_accepts_json_flag() {
        let cli = Cli::try_parse_from(["dialdesk", "--config", "dd.toml", "stats", "--json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dd.toml")));
        assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialdesk.toml");
        std::fs::write(&path, "[gateway]\nport = \"not-a-port\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
