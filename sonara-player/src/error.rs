//! Error types for sonara-player
//!
//! The playback synchronization core itself never fails; these errors cover
//! the edges around it (playlists, console commands, configuration).

use thiserror::Error;

/// Main error type for sonara-player
#[derive(Error, Debug)]
pub enum Error {
    /// Errors bubbled up from sonara-common (config, I/O, parsing)
    #[error(transparent)]
    Common(#[from] sonara_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Playlist file could not be interpreted
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// Console command could not be parsed
    #[error("Bad command: {0}")]
    BadCommand(String),

    /// Song index outside the queue
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Convenience Result type using sonara-player Error
pub type Result<T> = std::result::Result<T, Error>;
