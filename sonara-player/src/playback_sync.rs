//! Playback control synchronization
//!
//! [`PlaybackSync`] keeps the transport display (position, duration, play
//! state, volume) consistent with the one live audio resource, and turns
//! user gestures into resource mutations or store intents.
//!
//! The controls are either unbound (no song selected) or bound to the
//! current song. Binding acquires the active [`AudioHandle`] and subscribes
//! to its time-update, metadata-loaded and ended channels; the resulting
//! [`Subscription`] is released before any new handle is acquired, on every
//! path out of the bound state.
//!
//! The host calls [`PlaybackSync::reconcile`] whenever the store may have
//! changed, after the audio resource for the newly selected song is active.

use std::cell::RefCell;
use std::rc::Rc;

use sonara_common::events::{EventBus, NotificationKind, PlaybackEvent};
use sonara_common::{Song, SongId};
use tracing::{debug, info, trace};

use crate::audio::{AudioHandle, AudioHandleProvider, AudioNotification, Listener, Subscription};
use crate::store::{PlayerStatePatch, PlayerStore};
use crate::view::PlaybackView;

/// Binding state of the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No song selected
    Unbound,
    /// Song selected; `handle_attached` is false if no audio resource was
    /// available when the song was bound
    Bound { handle_attached: bool },
}

/// Values written by notification listeners
#[derive(Debug, Default)]
struct DisplayState {
    current_time_seconds: f64,
    duration_seconds: f64,
    /// Bumped on every bind/unbind; listeners from older bindings compare
    /// against it and drop their notifications
    generation: u64,
}

struct Binding {
    song: Song,
    subscription: Option<Subscription>,
}

/// Playback controls bound to a store and an audio handle provider
pub struct PlaybackSync<S: PlayerStore + 'static, P: AudioHandleProvider> {
    store: Rc<S>,
    provider: P,
    display: Rc<RefCell<DisplayState>>,
    binding: Option<Binding>,
    volume_percent: u8,
    events: Option<EventBus>,
}

impl<S: PlayerStore + 'static, P: AudioHandleProvider> PlaybackSync<S, P> {
    /// Create unbound controls with the given initial volume (clamped to 0-100)
    pub fn new(store: Rc<S>, provider: P, volume_percent: u8) -> Self {
        Self {
            store,
            provider,
            display: Rc::new(RefCell::new(DisplayState::default())),
            binding: None,
            volume_percent: volume_percent.min(100),
            events: None,
        }
    }

    /// Publish sync events on `events`
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> SyncState {
        match &self.binding {
            None => SyncState::Unbound,
            Some(binding) => SyncState::Bound {
                handle_attached: binding.subscription.is_some(),
            },
        }
    }

    /// Song the controls are bound to
    pub fn current_song(&self) -> Option<&Song> {
        self.binding.as_ref().map(|b| &b.song)
    }

    /// True while a song is bound
    pub fn controls_enabled(&self) -> bool {
        self.binding.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.store.is_playing()
    }

    pub fn current_time_seconds(&self) -> f64 {
        self.display.borrow().current_time_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.display.borrow().duration_seconds
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume_percent
    }

    /// Audio handle the controls are subscribed to
    pub fn handle(&self) -> Option<&Rc<dyn AudioHandle>> {
        self.binding
            .as_ref()
            .and_then(|b| b.subscription.as_ref())
            .map(Subscription::handle)
    }

    /// Render model for the current frame
    pub fn view(&self) -> PlaybackView {
        let display = self.display.borrow();
        PlaybackView::new(
            self.current_song(),
            self.store.is_playing(),
            display.current_time_seconds,
            display.duration_seconds,
            self.volume_percent,
        )
    }

    /// Bring the binding in line with the store's current song
    ///
    /// Returns true if the controls were bound, re-bound or unbound.
    pub fn reconcile(&mut self) -> bool {
        let selected = self.store.current_song();

        let unchanged = match (&self.binding, &selected) {
            (None, None) => true,
            (Some(binding), Some(song)) => binding.song.same_identity(song),
            _ => false,
        };
        if unchanged {
            // Same song; pick up edited display fields
            if let (Some(binding), Some(song)) = (self.binding.as_mut(), selected) {
                binding.song = song;
            }
            return false;
        }

        self.unbind();
        if let Some(song) = selected {
            self.bind(song);
        }
        true
    }

    /// Release the current binding, if any
    ///
    /// Safe to call repeatedly.
    pub fn unbind(&mut self) {
        let Some(mut binding) = self.binding.take() else {
            return;
        };

        // Invalidate listeners before detaching them
        {
            let mut display = self.display.borrow_mut();
            display.generation += 1;
            display.current_time_seconds = 0.0;
            display.duration_seconds = 0.0;
        }
        if let Some(mut subscription) = binding.subscription.take() {
            subscription.release();
        }

        debug!("Unbound playback controls from '{}'", binding.song.title);
        self.emit(PlaybackEvent::SongUnbound {
            song_id: binding.song.id,
            timestamp: chrono::Utc::now(),
        });
    }

    fn bind(&mut self, song: Song) {
        let generation = {
            let mut display = self.display.borrow_mut();
            display.generation += 1;
            display.current_time_seconds = 0.0;
            display.duration_seconds = 0.0;
            display.generation
        };

        let subscription = match self.provider.acquire() {
            Some(handle) => {
                handle.set_volume(f64::from(self.volume_percent) / 100.0);
                let listener = self.listener(generation, song.id.clone());
                Some(Subscription::attach(
                    handle,
                    NotificationKind::ALL.map(|kind| (kind, Rc::clone(&listener))),
                ))
            }
            None => {
                debug!("No audio resource available for '{}', controls inert", song.title);
                None
            }
        };

        info!("Bound playback controls to '{}' by {}", song.title, song.artist);
        self.emit(PlaybackEvent::SongBound {
            song_id: song.id.clone(),
            title: song.title.clone(),
            handle_attached: subscription.is_some(),
            timestamp: chrono::Utc::now(),
        });
        self.binding = Some(Binding { song, subscription });
    }

    fn listener(&self, generation: u64, song_id: SongId) -> Listener {
        let context = ListenerContext {
            display: Rc::clone(&self.display),
            store: Rc::clone(&self.store),
            events: self.events.clone(),
            generation,
            song_id,
        };
        Rc::new(move |notification: &AudioNotification| context.apply(notification))
    }

    /// Flip play/pause through the store
    ///
    /// Returns false (and does nothing) when no song is bound.
    pub fn toggle_play(&self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.store.toggle_play();
        true
    }

    /// Ask the store for the next song; call [`Self::reconcile`] afterwards
    pub fn play_next(&self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.store.play_next();
        true
    }

    /// Ask the store for the previous song; call [`Self::reconcile`] afterwards
    pub fn play_previous(&self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.store.play_previous();
        true
    }

    /// Move the resource's transport position
    ///
    /// The target is passed through unvalidated; the displayed position
    /// follows on the resource's next time update. Returns false when there
    /// is no handle to seek.
    pub fn seek(&self, target_seconds: f64) -> bool {
        match self.handle() {
            Some(handle) => {
                trace!("Seek to {}s", target_seconds);
                handle.set_current_time(target_seconds);
                true
            }
            None => false,
        }
    }

    /// Set the volume slider, clamped to 0-100
    ///
    /// Local state and the resource's native volume change together.
    /// Returns false (and does nothing) when no song is bound.
    pub fn set_volume(&mut self, percent: i32) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        // Clamped to 0..=100 so the cast is lossless
        let percent = percent.clamp(0, 100) as u8;
        self.volume_percent = percent;
        if let Some(handle) = self.handle() {
            handle.set_volume(f64::from(percent) / 100.0);
        }
        self.emit(PlaybackEvent::VolumeChanged {
            volume_percent: percent,
            timestamp: chrono::Utc::now(),
        });
        true
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            events.emit_lossy(event);
        }
    }
}

/// State captured by the listener attached for one binding
struct ListenerContext<S: PlayerStore> {
    display: Rc<RefCell<DisplayState>>,
    store: Rc<S>,
    events: Option<EventBus>,
    generation: u64,
    song_id: SongId,
}

impl<S: PlayerStore> ListenerContext<S> {
    fn apply(&self, notification: &AudioNotification) {
        if self.display.borrow().generation != self.generation {
            trace!("Dropping {} from a released binding", notification.kind());
            return;
        }

        match *notification {
            AudioNotification::TimeUpdate { current_time } => {
                let duration_seconds = {
                    let mut display = self.display.borrow_mut();
                    display.current_time_seconds = current_time;
                    display.duration_seconds
                };
                self.emit(PlaybackEvent::PlaybackProgress {
                    song_id: self.song_id.clone(),
                    position_seconds: current_time,
                    duration_seconds,
                    timestamp: chrono::Utc::now(),
                });
            }
            AudioNotification::MetadataLoaded { duration } => {
                self.display.borrow_mut().duration_seconds = duration;
                self.emit(PlaybackEvent::DurationChanged {
                    song_id: self.song_id.clone(),
                    duration_seconds: duration,
                    timestamp: chrono::Utc::now(),
                });
            }
            AudioNotification::Ended => {
                // Pause only; the queue does not advance
                self.store.set_state(PlayerStatePatch::paused());
                self.emit(PlaybackEvent::PlaybackEnded {
                    song_id: self.song_id.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            events.emit_lossy(event);
        }
    }
}
