//! Playback-related type definitions

use serde::{Deserialize, Serialize};

/// Playback state enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl From<bool> for PlaybackState {
    fn from(is_playing: bool) -> Self {
        if is_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Which notification channel of the audio resource produced an update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Transport position advanced or was seeked
    TimeUpdate,
    /// Duration became known
    MetadataLoaded,
    /// Playback reached the end of the media
    Ended,
}

impl NotificationKind {
    /// All channels, in subscription order
    pub const ALL: [NotificationKind; 3] = [
        NotificationKind::TimeUpdate,
        NotificationKind::MetadataLoaded,
        NotificationKind::Ended,
    ];
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::TimeUpdate => write!(f, "timeupdate"),
            NotificationKind::MetadataLoaded => write!(f, "loadedmetadata"),
            NotificationKind::Ended => write!(f, "ended"),
        }
    }
}
