//! Store-to-media driver
//!
//! Mirrors the store into the active media element: a newly selected song
//! gets a fresh element installed in the [`ActiveMedia`] slot (so the handle
//! identity changes across songs), clearing the selection empties the slot,
//! and the element follows the store's play/pause intent.

use std::rc::Rc;
use std::time::Duration;

use sonara_common::SongId;
use tracing::debug;

use crate::media::{ActiveMedia, MediaElement};
use crate::store::PlayerStore;

pub struct AudioDriver<S: PlayerStore> {
    store: Rc<S>,
    media: Rc<ActiveMedia>,
    loaded: Option<SongId>,
}

impl<S: PlayerStore> AudioDriver<S> {
    pub fn new(store: Rc<S>, media: Rc<ActiveMedia>) -> Self {
        Self {
            store,
            media,
            loaded: None,
        }
    }

    /// Id of the song loaded into the active element
    pub fn loaded(&self) -> Option<&SongId> {
        self.loaded.as_ref()
    }

    /// Apply the store's current song and play intent to the media slot
    ///
    /// Returns true if a different element was installed or the slot was
    /// cleared.
    pub fn sync(&mut self) -> bool {
        let selected = self.store.current_song();
        let changed = selected.as_ref().map(|s| &s.id) != self.loaded.as_ref();

        if changed {
            match selected {
                Some(song) => {
                    debug!("Loading '{}' into a new media element", song.title);
                    self.loaded = Some(song.id.clone());
                    self.media.install(Rc::new(MediaElement::with_song(song)));
                }
                None => {
                    debug!("Selection cleared, removing active media element");
                    self.loaded = None;
                    self.media.clear();
                }
            }
        }

        if let Some(element) = self.media.current() {
            let playing = self.store.is_playing();
            if playing && element.is_paused() {
                element.play();
            } else if !playing && !element.is_paused() {
                element.pause();
            }
        }

        changed
    }

    /// Advance the active element's clock
    pub fn tick(&self, elapsed: Duration) {
        if let Some(element) = self.media.current() {
            element.advance(elapsed);
        }
    }
}
