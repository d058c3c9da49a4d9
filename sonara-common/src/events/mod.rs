//! Event types for the Sonara event system
//!
//! Provides shared event definitions and the EventBus used to observe
//! playback synchronization from outside the control surface.

mod playback_types;

pub use playback_types::{NotificationKind, PlaybackState};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::SongId;

/// Sonara event types
///
/// Events are broadcast via EventBus and serialize with a `type` tag so they
/// can be logged or forwarded as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    /// Store play/pause intent changed (Playing ↔ Paused)
    PlaybackStateChanged {
        old_state: PlaybackState,
        new_state: PlaybackState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Controls were bound to a newly selected song
    ///
    /// `handle_attached` is false when no audio resource was available at
    /// bind time; the controls stay inert until the next song change.
    SongBound {
        song_id: SongId,
        title: String,
        handle_attached: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Controls released their subscription for a song
    SongUnbound {
        song_id: SongId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transport position reported by the audio resource
    PlaybackProgress {
        song_id: SongId,
        position_seconds: f64,
        duration_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Duration reported by the audio resource once metadata loaded
    DurationChanged {
        song_id: SongId,
        duration_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Local volume changed (already clamped to 0-100)
    VolumeChanged {
        volume_percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Audio resource reached the end of the current song
    ///
    /// NOTE: does not advance the queue; the store is only paused.
    PlaybackEnded {
        song_id: SongId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlaybackEvent {
    /// Short event name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            PlaybackEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            PlaybackEvent::SongBound { .. } => "SongBound",
            PlaybackEvent::SongUnbound { .. } => "SongUnbound",
            PlaybackEvent::PlaybackProgress { .. } => "PlaybackProgress",
            PlaybackEvent::DurationChanged { .. } => "DurationChanged",
            PlaybackEvent::VolumeChanged { .. } => "VolumeChanged",
            PlaybackEvent::PlaybackEnded { .. } => "PlaybackEnded",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// Publishing is synchronous, so it can be called from inside audio
/// notification callbacks.
///
/// # Examples
///
/// ```
/// use sonara_common::events::{EventBus, PlaybackEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(PlaybackEvent::VolumeChanged {
///     volume_percent: 40,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(matches!(
///     rx.try_recv(),
///     Ok(PlaybackEvent::VolumeChanged { volume_percent: 40, .. })
/// ));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlaybackEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// * `capacity` - Number of events to buffer before slow subscribers lag
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PlaybackEvent,
    ) -> Result<usize, broadcast::error::SendError<PlaybackEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Position updates and other high-frequency events use this: it is
    /// acceptable if no component is currently listening.
    pub fn emit_lossy(&self, event: PlaybackEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(position_seconds: f64) -> PlaybackEvent {
        PlaybackEvent::PlaybackProgress {
            song_id: SongId::new("song-1"),
            position_seconds,
            duration_seconds: 180.0,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(10);
        assert!(bus.emit(progress(1.0)).is_err());
        // Lossy emit must not panic either
        bus.emit_lossy(progress(2.0));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        assert_eq!(bus.emit(progress(1.0)).unwrap(), 1);
        bus.emit_lossy(progress(2.0));

        for expected in [1.0, 2.0] {
            match rx.recv().await.unwrap() {
                PlaybackEvent::PlaybackProgress { position_seconds, .. } => {
                    assert_eq!(position_seconds, expected)
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn test_subscriber_count_and_capacity() {
        let bus = EventBus::new(32);
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(bus.capacity(), 32);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PlaybackEvent::VolumeChanged {
            volume_percent: 75,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "VolumeChanged");
        assert_eq!(json["volume_percent"], 75);
        assert_eq!(event.event_type(), "VolumeChanged");
    }

    #[test]
    fn test_playback_state_from_bool() {
        assert_eq!(PlaybackState::from(true), PlaybackState::Playing);
        assert_eq!(PlaybackState::from(false), PlaybackState::Paused);
        assert!(PlaybackState::Playing.is_playing());
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
    }
}
