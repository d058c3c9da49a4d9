//! In-process media element
//!
//! [`MediaElement`] behaves like a browser audio element with a simulated
//! clock: loading a song leaves the duration unknown (`NaN`) until metadata
//! arrives, [`MediaElement::advance`] moves the transport while playing,
//! and reaching the end pauses the element and fires `ended`.
//!
//! [`ActiveMedia`] is the single "currently active element" slot the
//! playback controls acquire their handle from.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use sonara_common::events::NotificationKind;
use sonara_common::Song;
use tracing::{trace, warn};

use crate::audio::{AudioHandle, AudioHandleProvider, AudioNotification, Listener, ListenerId};

#[derive(Debug)]
struct ElementState {
    src: Option<Song>,
    current_time: f64,
    duration: f64,
    volume: f64,
    paused: bool,
    ended: bool,
    metadata_pending: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            src: None,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            paused: true,
            ended: false,
            metadata_pending: false,
        }
    }
}

/// Simulated audio element
#[derive(Default)]
pub struct MediaElement {
    state: RefCell<ElementState>,
    listeners: RefCell<Vec<(NotificationKind, ListenerId, Listener)>>,
    next_listener_id: Cell<u64>,
}

impl MediaElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element with `song` loaded and metadata still pending
    pub fn with_song(song: Song) -> Self {
        let element = Self::new();
        element.load(song);
        element
    }

    /// Point the element at a new song
    ///
    /// Resets position, pauses, and marks metadata as pending. No
    /// notification fires until [`MediaElement::load_metadata`] or the next
    /// [`MediaElement::advance`].
    pub fn load(&self, song: Song) {
        let mut state = self.state.borrow_mut();
        state.src = Some(song);
        state.current_time = 0.0;
        state.duration = f64::NAN;
        state.paused = true;
        state.ended = false;
        state.metadata_pending = true;
    }

    /// Deliver pending metadata
    ///
    /// Returns false if nothing was pending.
    pub fn load_metadata(&self) -> bool {
        let duration = {
            let mut state = self.state.borrow_mut();
            if !state.metadata_pending {
                return false;
            }
            let Some(song) = state.src.as_ref() else {
                return false;
            };
            let duration = if song.duration_seconds.is_finite() {
                song.duration_seconds.max(0.0)
            } else {
                f64::INFINITY
            };
            state.duration = duration;
            state.metadata_pending = false;
            duration
        };
        self.dispatch(AudioNotification::MetadataLoaded { duration });
        true
    }

    pub fn play(&self) {
        let mut state = self.state.borrow_mut();
        if state.src.is_none() {
            return;
        }
        // Playing an ended element restarts it
        if state.ended {
            state.current_time = 0.0;
            state.ended = false;
        }
        state.paused = false;
    }

    pub fn pause(&self) {
        self.state.borrow_mut().paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn has_ended(&self) -> bool {
        self.state.borrow().ended
    }

    pub fn song(&self) -> Option<Song> {
        self.state.borrow().src.clone()
    }

    /// Move the simulated clock forward by `elapsed`
    ///
    /// Delivers pending metadata first. While playing, emits a time update;
    /// on reaching the duration, clamps to it, pauses, and emits `ended`.
    pub fn advance(&self, elapsed: Duration) {
        self.load_metadata();

        let (current_time, reached_end) = {
            let mut state = self.state.borrow_mut();
            if state.paused || state.src.is_none() || state.duration.is_nan() {
                return;
            }
            let target = state.current_time + elapsed.as_secs_f64();
            let reached_end = target >= state.duration;
            state.current_time = target.min(state.duration);
            if reached_end {
                state.paused = true;
                state.ended = true;
            }
            (state.current_time, reached_end)
        };

        self.dispatch(AudioNotification::TimeUpdate { current_time });
        if reached_end {
            self.dispatch(AudioNotification::Ended);
        }
    }

    /// Invoke every listener on the notification's channel
    ///
    /// Listeners are collected before any is called, so a listener may add
    /// or remove listeners without conflicting borrows.
    pub fn dispatch(&self, notification: AudioNotification) {
        let kind = notification.kind();
        let targets: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();

        trace!("Dispatching {} to {} listener(s)", kind, targets.len());
        for listener in targets {
            listener(&notification);
        }
    }
}

impl AudioHandle for MediaElement {
    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    /// Clamps to `[0, duration]`, or to 0 while the duration is unknown
    fn set_current_time(&self, seconds: f64) {
        if seconds.is_nan() {
            warn!("Ignoring seek to NaN");
            return;
        }
        let current_time = {
            let mut state = self.state.borrow_mut();
            if state.src.is_none() {
                return;
            }
            let upper = if state.duration.is_nan() { 0.0 } else { state.duration };
            state.current_time = seconds.clamp(0.0, upper);
            if state.current_time < upper {
                state.ended = false;
            }
            state.current_time
        };
        self.dispatch(AudioNotification::TimeUpdate { current_time });
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn set_volume(&self, volume: f64) {
        if volume.is_nan() {
            warn!("Ignoring NaN volume");
            return;
        }
        if !(0.0..=1.0).contains(&volume) {
            warn!("Volume {} outside 0.0-1.0, clamping", volume);
        }
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn add_listener(&self, kind: NotificationKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((kind, id, listener));
        id
    }

    fn remove_listener(&self, kind: NotificationKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(k, i, _)| !(*k == kind && *i == id));
        listeners.len() != before
    }

    fn listener_count(&self, kind: NotificationKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }
}

impl std::fmt::Debug for MediaElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaElement")
            .field("state", &self.state.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// Slot holding the one active media element
#[derive(Debug, Default)]
pub struct ActiveMedia {
    slot: RefCell<Option<Rc<MediaElement>>>,
}

impl ActiveMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `element` the active one, returning the element it replaced
    pub fn install(&self, element: Rc<MediaElement>) -> Option<Rc<MediaElement>> {
        self.slot.borrow_mut().replace(element)
    }

    pub fn clear(&self) -> Option<Rc<MediaElement>> {
        self.slot.borrow_mut().take()
    }

    pub fn current(&self) -> Option<Rc<MediaElement>> {
        self.slot.borrow().clone()
    }
}

impl AudioHandleProvider for ActiveMedia {
    fn acquire(&self) -> Option<Rc<dyn AudioHandle>> {
        self.current().map(|element| element as Rc<dyn AudioHandle>)
    }
}
