//! Test helpers for sonara-player integration tests
//!
//! - `CountingHandle`: media element that records every mutation the
//!   controls make
//! - `SlotProvider`: provider whose active handle the test swaps by hand
//! - `DeafHandle`: handle that ignores listener removal

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sonara_common::events::NotificationKind;
use sonara_common::Song;
use sonara_player::audio::{AudioHandle, AudioHandleProvider, AudioNotification, Listener, ListenerId};
use sonara_player::media::MediaElement;

pub fn song(id: &str, duration_seconds: f64) -> Song {
    Song::new(format!("Title {}", id), format!("Artist {}", id), duration_seconds).with_id(id)
}

/// Media element wrapper counting seeks and volume changes
#[derive(Debug, Default)]
pub struct CountingHandle {
    pub element: MediaElement,
    pub seeks: RefCell<Vec<f64>>,
    pub volume_sets: Cell<usize>,
}

impl CountingHandle {
    pub fn with_song(song: Song) -> Rc<Self> {
        Rc::new(Self {
            element: MediaElement::with_song(song),
            ..Default::default()
        })
    }

    pub fn emit(&self, notification: AudioNotification) {
        self.element.dispatch(notification);
    }

    pub fn total_listeners(&self) -> usize {
        NotificationKind::ALL
            .iter()
            .map(|kind| self.element.listener_count(*kind))
            .sum()
    }

    pub fn mutation_count(&self) -> usize {
        self.seeks.borrow().len() + self.volume_sets.get()
    }
}

impl AudioHandle for CountingHandle {
    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&self, seconds: f64) {
        self.seeks.borrow_mut().push(seconds);
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn volume(&self) -> f64 {
        self.element.volume()
    }

    fn set_volume(&self, volume: f64) {
        self.volume_sets.set(self.volume_sets.get() + 1);
        self.element.set_volume(volume);
    }

    fn add_listener(&self, kind: NotificationKind, listener: Listener) -> ListenerId {
        self.element.add_listener(kind, listener)
    }

    fn remove_listener(&self, kind: NotificationKind, id: ListenerId) -> bool {
        self.element.remove_listener(kind, id)
    }

    fn listener_count(&self, kind: NotificationKind) -> usize {
        self.element.listener_count(kind)
    }
}

/// Handle that never detaches listeners
#[derive(Default)]
pub struct DeafHandle {
    listeners: RefCell<Vec<(NotificationKind, Listener)>>,
}

impl DeafHandle {
    pub fn emit(&self, notification: AudioNotification) {
        let targets: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == notification.kind())
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in targets {
            listener(&notification);
        }
    }
}

impl AudioHandle for DeafHandle {
    fn current_time(&self) -> f64 {
        0.0
    }

    fn set_current_time(&self, _seconds: f64) {}

    fn duration(&self) -> f64 {
        f64::NAN
    }

    fn volume(&self) -> f64 {
        1.0
    }

    fn set_volume(&self, _volume: f64) {}

    fn add_listener(&self, kind: NotificationKind, listener: Listener) -> ListenerId {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push((kind, listener));
        ListenerId(listeners.len() as u64)
    }

    fn remove_listener(&self, _kind: NotificationKind, _id: ListenerId) -> bool {
        false
    }

    fn listener_count(&self, kind: NotificationKind) -> usize {
        self.listeners.borrow().iter().filter(|(k, _)| *k == kind).count()
    }
}

/// Provider with a hand-managed active handle
#[derive(Default)]
pub struct SlotProvider {
    slot: RefCell<Option<Rc<dyn AudioHandle>>>,
    pub acquisitions: Cell<usize>,
}

impl SlotProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set(&self, handle: Option<Rc<dyn AudioHandle>>) {
        *self.slot.borrow_mut() = handle;
    }
}

impl AudioHandleProvider for SlotProvider {
    fn acquire(&self) -> Option<Rc<dyn AudioHandle>> {
        self.acquisitions.set(self.acquisitions.get() + 1);
        self.slot.borrow().clone()
    }
}
