//! Shared player store
//!
//! The store is the single authority on which song is selected and whether
//! playback is intended. The controls read it and send it intents; they
//! never flip `is_playing` themselves except through [`PlayerStore::set_state`]
//! when the audio resource reports the end of a track.

use std::cell::{Cell, RefCell};

use sonara_common::Song;
use tracing::debug;

/// Partial update applied by [`PlayerStore::set_state`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatePatch {
    pub is_playing: Option<bool>,
}

impl PlayerStatePatch {
    /// Patch that pauses playback
    pub fn paused() -> Self {
        Self {
            is_playing: Some(false),
        }
    }
}

/// Read and intent surface of the player store
pub trait PlayerStore {
    fn current_song(&self) -> Option<Song>;
    fn is_playing(&self) -> bool;
    fn toggle_play(&self);
    fn play_next(&self);
    fn play_previous(&self);
    /// Bulk update of store fields
    fn set_state(&self, patch: PlayerStatePatch);
}

#[derive(Debug, Default)]
struct StoreState {
    queue: Vec<Song>,
    current_index: Option<usize>,
    current_song: Option<Song>,
    is_playing: bool,
}

/// Queue-backed player store
///
/// Every mutation bumps [`SharedPlayerStore::revision`], so a host can tell
/// cheaply whether anything changed since it last looked.
#[derive(Debug, Default)]
pub struct SharedPlayerStore {
    state: RefCell<StoreState>,
    revision: Cell<u64>,
}

impl SharedPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn queue(&self) -> Vec<Song> {
        self.state.borrow().queue.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.borrow().current_index
    }

    /// Replace the queue without starting playback
    ///
    /// Keeps an existing selection; otherwise the first entry becomes current.
    pub fn initialize_queue(&self, songs: Vec<Song>) {
        self.mutate(|state| {
            if state.current_song.is_none() {
                state.current_song = songs.first().cloned();
                state.current_index = if songs.is_empty() { None } else { Some(0) };
            } else {
                state.current_index = state
                    .current_song
                    .as_ref()
                    .and_then(|current| songs.iter().position(|s| s.same_identity(current)));
            }
            state.queue = songs;
        });
    }

    /// Replace the queue and start playing from `start_index`
    pub fn play_album(&self, songs: Vec<Song>, start_index: usize) {
        let Some(song) = songs.get(start_index).cloned() else {
            debug!(
                "play_album ignored: index {} outside {} songs",
                start_index,
                songs.len()
            );
            return;
        };
        self.mutate(|state| {
            state.queue = songs;
            state.current_song = Some(song);
            state.current_index = Some(start_index);
            state.is_playing = true;
        });
    }

    /// Select a song and start playing it, or clear the selection
    pub fn set_current_song(&self, song: Option<Song>) {
        self.mutate(|state| match song {
            Some(song) => {
                if let Some(index) = state.queue.iter().position(|s| s.same_identity(&song)) {
                    state.current_index = Some(index);
                }
                state.current_song = Some(song);
                state.is_playing = true;
            }
            None => {
                state.current_song = None;
                state.current_index = None;
                state.is_playing = false;
            }
        });
    }

    /// Select the queue entry at `index` and start playing it
    ///
    /// Returns false if the index is outside the queue.
    pub fn select_index(&self, index: usize) -> bool {
        let song = self.state.borrow().queue.get(index).cloned();
        match song {
            Some(song) => {
                self.mutate(|state| {
                    state.current_song = Some(song);
                    state.current_index = Some(index);
                    state.is_playing = true;
                });
                true
            }
            None => false,
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut StoreState)) {
        f(&mut *self.state.borrow_mut());
        self.revision.set(self.revision.get() + 1);
    }
}

impl PlayerStore for SharedPlayerStore {
    fn current_song(&self) -> Option<Song> {
        self.state.borrow().current_song.clone()
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().is_playing
    }

    fn toggle_play(&self) {
        if self.state.borrow().current_song.is_none() {
            return;
        }
        self.mutate(|state| state.is_playing = !state.is_playing);
    }

    fn play_next(&self) {
        self.mutate(|state| {
            let next = state.current_index.map_or(0, |i| i + 1);
            match state.queue.get(next) {
                Some(song) => {
                    state.current_song = Some(song.clone());
                    state.current_index = Some(next);
                    state.is_playing = true;
                }
                // End of queue: stay on the current song, stop playing
                None => state.is_playing = false,
            }
        });
    }

    fn play_previous(&self) {
        self.mutate(|state| {
            let previous = state.current_index.and_then(|i| i.checked_sub(1));
            match previous.and_then(|i| state.queue.get(i).map(|song| (i, song.clone()))) {
                Some((index, song)) => {
                    state.current_song = Some(song);
                    state.current_index = Some(index);
                    state.is_playing = true;
                }
                None => state.is_playing = false,
            }
        });
    }

    fn set_state(&self, patch: PlayerStatePatch) {
        self.mutate(|state| {
            if let Some(is_playing) = patch.is_playing {
                state.is_playing = is_playing;
            }
        });
    }
}
