//! # Sonara Player Library (sonara-player)
//!
//! Playback controls kept in sync with a live audio resource.
//!
//! **Purpose:** Bind the transport display (position, duration, play state,
//! volume) to the one active audio handle and a shared player store, and
//! route user gestures back to them.
//!
//! **Architecture:** single-threaded and event driven. The store and the
//! audio handle are injected collaborators; notifications arrive as
//! synchronous callbacks and are released through RAII subscriptions.

pub mod app;
pub mod audio;
pub mod commands;
pub mod driver;
pub mod error;
pub mod media;
pub mod playback_sync;
pub mod playlist;
pub mod store;
pub mod view;

pub use error::{Error, Result};
pub use playback_sync::{PlaybackSync, SyncState};
