//! Playlist loading
//!
//! Accepts a saved song listing from the backend (a JSON array of song
//! documents, or an object with a `songs` array) or a TOML file with a
//! `[[songs]]` table array.

use std::path::Path;

use serde::Deserialize;
use sonara_common::Song;
use tracing::info;

use crate::{Error, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPlaylist {
    Listing(Vec<Song>),
    Wrapped { songs: Vec<Song> },
}

#[derive(Deserialize)]
struct TomlPlaylist {
    #[serde(default)]
    songs: Vec<Song>,
}

pub fn parse_json(content: &str) -> Result<Vec<Song>> {
    let playlist: JsonPlaylist =
        serde_json::from_str(content).map_err(sonara_common::Error::from)?;
    Ok(match playlist {
        JsonPlaylist::Listing(songs) | JsonPlaylist::Wrapped { songs } => songs,
    })
}

pub fn parse_toml(content: &str) -> Result<Vec<Song>> {
    let playlist: TomlPlaylist = toml::from_str(content).map_err(sonara_common::Error::from)?;
    Ok(playlist.songs)
}

/// Load a playlist, choosing the format by file extension
pub fn load_playlist(path: &Path) -> Result<Vec<Song>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let songs = match extension.as_deref() {
        Some("json") => parse_json(&std::fs::read_to_string(path)?)?,
        Some("toml") => parse_toml(&std::fs::read_to_string(path)?)?,
        _ => {
            return Err(Error::Playlist(format!(
                "unsupported playlist format: {}",
                path.display()
            )))
        }
    };

    info!("Loaded {} song(s) from {}", songs.len(), path.display());
    Ok(songs)
}
