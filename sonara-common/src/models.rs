//! Song model shared by the player store and the playback surface
//!
//! Field names follow the song documents served by the backend's song
//! listing (`_id`, `imageUrl`, `audioUrl`, ...), so a saved listing can be
//! deserialized directly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable song identity
///
/// Backend documents carry opaque string ids; songs created locally get a
/// random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A playable song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(rename = "_id", default = "SongId::generate")]
    pub id: SongId,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub audio_url: String,
    /// Track length in seconds as recorded by the backend
    #[serde(rename = "duration", default)]
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
}

impl Song {
    /// Create a song with a generated id and no media URLs
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            id: SongId::generate(),
            title: title.into(),
            artist: artist.into(),
            image_url: String::new(),
            audio_url: String::new(),
            duration_seconds,
            album_id: None,
        }
    }

    /// Same song with a fixed id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = SongId::new(id);
        self
    }

    /// Two songs are the same selection when their ids match
    pub fn same_identity(&self, other: &Song) -> bool {
        self.id == other.id
    }
}
