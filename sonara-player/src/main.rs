//! Sonara Player (sonara-player) - Main entry point
//!
//! Console front end for the playback controls: loads a playlist, runs the
//! simulated playback clock, reads commands from stdin and prints a status
//! line whenever the rendered view changes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sonara_common::config::{resolve_player_config, ConfigOverrides};
use sonara_common::events::EventBus;
use sonara_player::app::{Outcome, PlayerApp};
use sonara_player::commands::Command;
use sonara_player::playlist::load_playlist;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sonara-player
#[derive(Parser, Debug)]
#[command(name = "sonara-player")]
#[command(about = "Console playback controls for Sonara")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Playlist file (.json song listing or .toml)
    #[arg(short, long, env = "SONARA_PLAYLIST")]
    playlist: Option<PathBuf>,

    /// Playback clock tick interval in milliseconds
    #[arg(long, env = "SONARA_TICK_MS")]
    tick_ms: Option<u64>,

    /// Initial volume (0-100)
    #[arg(long, env = "SONARA_VOLUME", value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Start playing the first song immediately (`--autoplay false` disables)
    #[arg(
        long,
        env = "SONARA_AUTOPLAY",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    autoplay: Option<bool>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SONARA_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            default_volume: self.volume,
            tick_ms: self.tick_ms,
            playlist: self.playlist.clone(),
            autoplay: self.autoplay,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_source) =
        resolve_player_config(args.config.as_deref(), args.overrides())
            .context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config_source.log();
    info!("Starting Sonara player (tick {} ms)", config.tick_ms);

    let events = EventBus::new(config.event_bus_capacity);
    let mut event_rx = events.subscribe();
    let mut app = PlayerApp::new(&config, events);

    if let Some(path) = &config.playlist {
        let songs = load_playlist(path)
            .with_context(|| format!("Failed to load playlist {}", path.display()))?;
        app.load_queue(songs, config.autoplay);
    } else {
        warn!("No playlist configured; use --playlist to load songs");
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut last_status = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                app.tick(now - last_tick);
                last_tick = now;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match line.parse::<Command>() {
                        Ok(command) => match app.execute(command) {
                            Ok(Outcome::Quit) => break,
                            Ok(Outcome::Message(message)) => println!("{}", message),
                            Ok(Outcome::Continue) => {}
                            Err(e) => println!("{}", e),
                        },
                        Err(e) => println!("{} (type 'help')", e),
                    },
                    None => {
                        info!("stdin closed; playing until interrupted");
                        stdin_open = false;
                    }
                }
            }
            event = event_rx.recv() => match event {
                Ok(event) => debug!(event = event.event_type(), "{:?}", event),
                Err(RecvError::Lagged(skipped)) => warn!("Event log lagged, skipped {} event(s)", skipped),
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }

        let status = app.view().to_string();
        if status != last_status {
            println!("{}", status);
            last_status = status;
        }
    }

    info!("Player shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
