//! Player application wiring
//!
//! Composes the store, the active media slot, the driver that mirrors the
//! store into media, and the playback controls. Every change is settled in
//! the same order: the driver installs or updates the media element first,
//! then the controls reconcile against it.

use std::rc::Rc;
use std::time::Duration;

use sonara_common::config::PlayerConfig;
use sonara_common::events::{EventBus, PlaybackEvent, PlaybackState};
use sonara_common::Song;
use tracing::info;

use crate::commands::{Command, HELP};
use crate::driver::AudioDriver;
use crate::media::ActiveMedia;
use crate::playback_sync::PlaybackSync;
use crate::store::{PlayerStore, SharedPlayerStore};
use crate::view::PlaybackView;
use crate::{Error, Result};

/// Result of executing one command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue,
    /// Text to show the user
    Message(String),
    Quit,
}

pub struct PlayerApp {
    store: Rc<SharedPlayerStore>,
    media: Rc<ActiveMedia>,
    driver: AudioDriver<SharedPlayerStore>,
    controls: PlaybackSync<SharedPlayerStore, Rc<ActiveMedia>>,
    events: EventBus,
    settled_revision: u64,
    last_state: PlaybackState,
}

impl PlayerApp {
    pub fn new(config: &PlayerConfig, events: EventBus) -> Self {
        let store = Rc::new(SharedPlayerStore::new());
        let media = Rc::new(ActiveMedia::new());
        let driver = AudioDriver::new(Rc::clone(&store), Rc::clone(&media));
        let controls = PlaybackSync::new(Rc::clone(&store), Rc::clone(&media), config.default_volume)
            .with_event_bus(events.clone());

        Self {
            settled_revision: store.revision(),
            store,
            media,
            driver,
            controls,
            events,
            last_state: PlaybackState::Paused,
        }
    }

    pub fn store(&self) -> &Rc<SharedPlayerStore> {
        &self.store
    }

    pub fn media(&self) -> &Rc<ActiveMedia> {
        &self.media
    }

    pub fn controls(&self) -> &PlaybackSync<SharedPlayerStore, Rc<ActiveMedia>> {
        &self.controls
    }

    pub fn view(&self) -> PlaybackView {
        self.controls.view()
    }

    /// Replace the queue; with `autoplay` the first song starts playing
    pub fn load_queue(&mut self, songs: Vec<Song>, autoplay: bool) {
        info!("Queue loaded with {} song(s)", songs.len());
        if autoplay {
            self.store.play_album(songs, 0);
        } else {
            self.store.initialize_queue(songs);
        }
        self.settle();
    }

    /// Advance playback by `elapsed` and apply any store change it caused
    pub fn tick(&mut self, elapsed: Duration) {
        self.driver.tick(elapsed);
        if self.store.revision() != self.settled_revision {
            self.settle();
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::TogglePlay => self.gesture(self.controls.toggle_play()),
            Command::Next => self.gesture(self.controls.play_next()),
            Command::Previous => self.gesture(self.controls.play_previous()),
            Command::Seek(seconds) => self.gesture(self.controls.seek(seconds)),
            Command::Volume(percent) => {
                let accepted = self.controls.set_volume(percent);
                self.gesture(accepted)
            }
            Command::Select(position) => {
                let selected = position
                    .checked_sub(1)
                    .is_some_and(|index| self.store.select_index(index));
                if !selected {
                    return Err(Error::NotFound(format!(
                        "queue position {} (queue has {})",
                        position,
                        self.store.queue().len()
                    )));
                }
                Outcome::Continue
            }
            Command::Clear => {
                self.store.set_current_song(None);
                Outcome::Continue
            }
            Command::Queue => Outcome::Message(self.queue_listing()),
            Command::Status => Outcome::Message(self.view().to_string()),
            Command::Help => Outcome::Message(HELP.to_string()),
            Command::Quit => Outcome::Quit,
        };
        self.settle();
        Ok(outcome)
    }

    fn gesture(&self, accepted: bool) -> Outcome {
        if accepted {
            Outcome::Continue
        } else {
            Outcome::Message("controls disabled: nothing selected".to_string())
        }
    }

    fn queue_listing(&self) -> String {
        let current = self.store.current_index();
        let queue = self.store.queue();
        if queue.is_empty() {
            return "(queue empty)".to_string();
        }
        queue
            .iter()
            .enumerate()
            .map(|(i, song)| {
                let marker = if Some(i) == current { '*' } else { ' ' };
                format!("{}{:>3}. {} — {}", marker, i + 1, song.title, song.artist)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Driver first, then controls, then publish play-state changes
    fn settle(&mut self) {
        self.driver.sync();
        self.controls.reconcile();
        self.settled_revision = self.store.revision();

        let state = PlaybackState::from(self.store.is_playing());
        if state != self.last_state {
            info!("Playback state changed: {} -> {}", self.last_state, state);
            self.events.emit_lossy(PlaybackEvent::PlaybackStateChanged {
                old_state: self.last_state,
                new_state: state,
                timestamp: chrono::Utc::now(),
            });
            self.last_state = state;
        }
    }
}
