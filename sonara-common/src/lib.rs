//! # Sonara Common Library
//!
//! Shared code for the Sonara player crates including:
//! - Song model shared by the store and the playback surface
//! - Event types (PlaybackEvent enum) and the EventBus
//! - Configuration loading
//! - Clock formatting for transport displays

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod models;

pub use error::{Error, Result};
pub use models::{Song, SongId};
