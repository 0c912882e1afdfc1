//! WhatsApp log monitor - lifecycle events from the leveldb log.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wa_log_monitor::config::{default_watch_dir, ConfigLoader};
use wa_log_monitor::monitor::{DirectoryWatcher, LogScanner};

#[derive(Parser)]
#[command(
    name = "wa-log-monitor",
    about = "Watches WhatsApp's leveldb log and reports init/message events",
    version
)]
struct Cli {
    /// Directory containing the leveldb .log files. Defaults to the
    /// config file value, then the platform WhatsApp data directory.
    watch_dir: Option<PathBuf>,

    /// Path to a config file (otherwise searched in standard locations).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Could not load configuration");
            std::process::exit(1);
        }
    };

    let Some(watch_dir) = cli
        .watch_dir
        .or(config.watch_dir)
        .or_else(default_watch_dir)
    else {
        tracing::error!("No watch directory given and no platform default available");
        std::process::exit(1);
    };

    tracing::info!(dir = %watch_dir.display(), "Watching leveldb directory");

    let mut scanner = LogScanner::new();
    scanner.on_full_init(|| {
        tracing::info!("WhatsApp fully initialized");
        println!("full-init");
    });
    scanner.on_message_received(|| {
        tracing::info!("New message received");
        println!("message-received");
    });

    let debounce = Duration::from_millis(config.debounce_ms);
    let (watcher, mut changes) = match DirectoryWatcher::new(watch_dir, debounce) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "Could not start directory watcher");
            std::process::exit(1);
        }
    };

    // Single consumer: each notification is handled to completion, in
    // delivery order, before the next one is taken.
    loop {
        tokio::select! {
            change = changes.recv() => {
                match change {
                    Some(change) => scanner.handle_change(&change).await,
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    watcher.stop();
}
