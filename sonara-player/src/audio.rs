//! Audio resource contracts
//!
//! The playback controls never own the media they display. They acquire the
//! currently active [`AudioHandle`] through an [`AudioHandleProvider`],
//! attach listeners to its notification channels, and detach them again
//! through a [`Subscription`] value.

use std::rc::Rc;

use sonara_common::events::NotificationKind;

/// Notification delivered by an audio resource
///
/// Each variant carries the value the resource reported at emission time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioNotification {
    TimeUpdate { current_time: f64 },
    MetadataLoaded { duration: f64 },
    Ended,
}

impl AudioNotification {
    /// Channel this notification is delivered on
    pub fn kind(&self) -> NotificationKind {
        match self {
            AudioNotification::TimeUpdate { .. } => NotificationKind::TimeUpdate,
            AudioNotification::MetadataLoaded { .. } => NotificationKind::MetadataLoaded,
            AudioNotification::Ended => NotificationKind::Ended,
        }
    }
}

/// Callback invoked synchronously for each notification on a channel
pub type Listener = Rc<dyn Fn(&AudioNotification)>;

/// Token returned by [`AudioHandle::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// One live, playable media resource
///
/// Methods take `&self`: implementations use interior mutability, matching
/// a platform media element that many parties hold references to.
pub trait AudioHandle {
    /// Transport position in seconds
    fn current_time(&self) -> f64;

    /// Move the transport position; the resource decides how to clamp
    fn set_current_time(&self, seconds: f64);

    /// Media length in seconds (`NaN` until metadata is loaded)
    fn duration(&self) -> f64;

    /// Native volume in `0.0..=1.0`
    fn volume(&self) -> f64;

    fn set_volume(&self, volume: f64);

    fn add_listener(&self, kind: NotificationKind, listener: Listener) -> ListenerId;

    /// Returns false if the listener was not registered
    fn remove_listener(&self, kind: NotificationKind, id: ListenerId) -> bool;

    /// Number of listeners currently attached to a channel
    fn listener_count(&self, kind: NotificationKind) -> usize;
}

/// Supplies the currently active audio resource, if any
pub trait AudioHandleProvider {
    fn acquire(&self) -> Option<Rc<dyn AudioHandle>>;
}

impl<P: AudioHandleProvider + ?Sized> AudioHandleProvider for Rc<P> {
    fn acquire(&self) -> Option<Rc<dyn AudioHandle>> {
        (**self).acquire()
    }
}

/// Listeners attached to one audio handle
///
/// Dropping the subscription detaches every listener it attached.
/// [`Subscription::release`] does the same eagerly and may be called any
/// number of times.
pub struct Subscription {
    handle: Rc<dyn AudioHandle>,
    attached: Vec<(NotificationKind, ListenerId)>,
}

impl Subscription {
    /// Attach each listener to its channel on `handle`
    pub fn attach<I>(handle: Rc<dyn AudioHandle>, listeners: I) -> Self
    where
        I: IntoIterator<Item = (NotificationKind, Listener)>,
    {
        let attached = listeners
            .into_iter()
            .map(|(kind, listener)| (kind, handle.add_listener(kind, listener)))
            .collect();
        Self { handle, attached }
    }

    pub fn handle(&self) -> &Rc<dyn AudioHandle> {
        &self.handle
    }

    /// True until the subscription is released
    pub fn is_active(&self) -> bool {
        !self.attached.is_empty()
    }

    /// Detach all listeners
    pub fn release(&mut self) {
        for (kind, id) in self.attached.drain(..) {
            self.handle.remove_listener(kind, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.attached)
            .finish()
    }
}
