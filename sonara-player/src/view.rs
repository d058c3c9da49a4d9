//! Render model for the playback controls

use serde::Serialize;
use sonara_common::human_time::format_clock;
use sonara_common::Song;

/// Seek bar maximum used while the duration is still unknown
pub const SEEK_MAX_PLACEHOLDER: f64 = 100.0;

/// Icon shown on the play/pause button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayIcon {
    Play,
    Pause,
}

/// Display fields of the current song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub image_url: String,
}

impl From<&Song> for NowPlaying {
    fn from(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            image_url: song.image_url.clone(),
        }
    }
}

/// Everything the rendering surface needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackView {
    pub now_playing: Option<NowPlaying>,
    pub is_playing: bool,
    pub play_icon: PlayIcon,
    pub current_time_seconds: f64,
    pub duration_seconds: f64,
    /// `None` when no song is current
    pub current_time_label: Option<String>,
    pub duration_label: Option<String>,
    pub volume_percent: u8,
    /// Transport, seek and volume controls accept input
    pub controls_enabled: bool,
    pub seek_max: f64,
}

impl PlaybackView {
    pub fn new(
        song: Option<&Song>,
        is_playing: bool,
        current_time_seconds: f64,
        duration_seconds: f64,
        volume_percent: u8,
    ) -> Self {
        let controls_enabled = song.is_some();
        let (current_time_label, duration_label) = if controls_enabled {
            (
                Some(format_clock(current_time_seconds)),
                Some(format_clock(duration_seconds)),
            )
        } else {
            (None, None)
        };
        let seek_max = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            SEEK_MAX_PLACEHOLDER
        };

        Self {
            now_playing: song.map(NowPlaying::from),
            is_playing,
            play_icon: if is_playing { PlayIcon::Pause } else { PlayIcon::Play },
            current_time_seconds,
            duration_seconds,
            current_time_label,
            duration_label,
            volume_percent,
            controls_enabled,
            seek_max,
        }
    }
}

impl std::fmt::Display for PlaybackView {
    /// One-line status, e.g. `▶ Song — Artist  0:42 / 3:10  vol 75%`
    ///
    /// The leading glyph shows the playback state (`▶` playing, `⏸` paused),
    /// not the button icon.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(song) = &self.now_playing else {
            return write!(f, "(nothing playing)  vol {}%", self.volume_percent);
        };
        let state_glyph = if self.is_playing { "▶" } else { "⏸" };
        write!(
            f,
            "{} {} — {}  {} / {}  vol {}%",
            state_glyph,
            song.title,
            song.artist,
            self.current_time_label.as_deref().unwrap_or("-:--"),
            self.duration_label.as_deref().unwrap_or("-:--"),
            self.volume_percent
        )
    }
}
