//! Configuration loading and config file resolution
//!
//! Player settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values arrive together as
//! [`ConfigOverrides`] (clap reads both); the TOML file is located by
//! [`resolve_config_path`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONARA_CONFIG";

/// Volume applied before the user touches the slider
pub const DEFAULT_VOLUME_PERCENT: u8 = 75;

/// Interval between simulated playback clock ticks
pub const DEFAULT_TICK_MS: u64 = 250;

/// Events buffered per EventBus subscriber before it lags
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 100;

/// Player configuration (TOML schema)
///
/// Every field is optional in the file; missing fields take compiled
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume slider position (0-100)
    pub default_volume: u8,
    /// Playback clock tick interval in milliseconds
    pub tick_ms: u64,
    /// EventBus channel capacity
    pub event_bus_capacity: usize,
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
    /// Playlist loaded at startup
    pub playlist: Option<PathBuf>,
    /// Start playing the first song after loading the playlist
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME_PERCENT,
            tick_ms: DEFAULT_TICK_MS,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
            log_level: "info".to_string(),
            playlist: None,
            autoplay: false,
        }
    }
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub default_volume: Option<u8>,
    pub tick_ms: Option<u64>,
    pub playlist: Option<PathBuf>,
    pub autoplay: Option<bool>,
    pub log_level: Option<String>,
}

impl PlayerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlayerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        // Relative playlist paths are relative to the config file
        if let (Some(playlist), Some(dir)) = (config.playlist.as_ref(), path.parent()) {
            if playlist.is_relative() {
                config.playlist = Some(dir.join(playlist));
            }
        }

        Ok(config)
    }

    /// Reject values no component can honor
    pub fn validate(&self) -> Result<()> {
        if self.default_volume > 100 {
            return Err(Error::Config(format!(
                "default_volume must be within 0-100, got {}",
                self.default_volume
            )));
        }
        if self.tick_ms == 0 {
            return Err(Error::Config("tick_ms must be greater than zero".to_string()));
        }
        if self.event_bus_capacity == 0 {
            return Err(Error::Config(
                "event_bus_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line / environment values on top of this config
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(volume) = overrides.default_volume {
            self.default_volume = volume;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            self.tick_ms = tick_ms;
        }
        if let Some(playlist) = overrides.playlist {
            self.playlist = Some(playlist);
        }
        if let Some(autoplay) = overrides.autoplay {
            self.autoplay = autoplay;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Locate the TOML config file
///
/// Priority: command-line path, then `SONARA_CONFIG`, then the platform
/// config directory (`~/.config/sonara/config.toml` on Linux). The platform
/// file is only returned if it exists; explicit paths are returned as given.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sonara").join("config.toml"))
}

/// Where the base configuration (before overrides) came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// A path was named but no file exists there
    Missing(PathBuf),
    /// No config file located
    Defaults,
}

impl ConfigSource {
    /// Report where the config came from
    ///
    /// Binaries call this after installing their subscriber so the
    /// missing-file warning is not lost.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => debug!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            ),
            ConfigSource::Defaults => debug!("No config file found, using compiled defaults"),
        }
    }
}

/// Resolve the player config and report its source without logging
///
/// A missing file falls back to compiled defaults; a file that exists but
/// cannot be parsed is an error.
pub fn resolve_player_config(
    cli_arg: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<(PlayerConfig, ConfigSource)> {
    let (base, source) = match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => (PlayerConfig::load_file(&path)?, ConfigSource::File(path)),
        Some(path) => (PlayerConfig::default(), ConfigSource::Missing(path)),
        None => (PlayerConfig::default(), ConfigSource::Defaults),
    };

    Ok((base.apply_overrides(overrides)?, source))
}

/// Load the player config with graceful degradation
///
/// Same as [`resolve_player_config`], logging the source immediately.
pub fn load_player_config(
    cli_arg: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<PlayerConfig> {
    let (config, source) = resolve_player_config(cli_arg, overrides)?;
    source.log();
    Ok(config)
}
