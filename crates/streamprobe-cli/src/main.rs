//! Streamprobe - Interactive Stream Test Harness
//!
//! Features:
//! - Set a stream URL and play/pause/stop/jump to live
//! - Timestamped event log with per-row detail
//! - Best-effort event relay to a remote collector
//! - Last-used URL persisted across runs

use clap::Parser;
use std::path::PathBuf;
use streamprobe_core::{HarnessSession, JsonFileStore, PlayerFacade};
use url::Url;

mod commands;
mod probe;

use probe::HttpProbePlayer;

/// Streamprobe - drive a stream URL and watch the event log
#[derive(Parser)]
#[command(name = "streamprobe")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Interactive test harness for streaming video URLs", long_about = None)]
struct Cli {
    /// Stream URL to set before the prompt starts
    url: Option<String>,

    /// Relay every event to this collector URL
    #[arg(short, long)]
    report_url: Option<Url>,

    /// Settings file holding the last-used URL
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn default_settings_path() -> PathBuf {
    std::env::temp_dir().join("streamprobe-settings.json")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    let settings_path = cli.settings.unwrap_or_else(default_settings_path);
    let store = JsonFileStore::open(&settings_path)?;

    let mut player = HttpProbePlayer::new();
    let notices = player.subscribe();
    let mut session = HarnessSession::new(player, store, cli.report_url);

    if let Some(url) = cli.url {
        session.set_url(&url).await;
    }

    commands::run(session, notices).await
}
