//! PlaybackSync integration tests
//!
//! Drives the controls against the queue store and hand-managed audio
//! handles: binding lifecycle, notification handling, gestures, and the
//! guarantee that a released handle can no longer change what is displayed.

mod helpers;

use std::rc::Rc;

use helpers::{song, CountingHandle, DeafHandle, SlotProvider};
use sonara_common::events::{EventBus, PlaybackEvent};
use sonara_player::audio::{AudioHandle, AudioNotification};
use sonara_player::store::{PlayerStore, SharedPlayerStore};
use sonara_player::view::PlayIcon;
use sonara_player::{PlaybackSync, SyncState};

type Controls = PlaybackSync<SharedPlayerStore, Rc<SlotProvider>>;

struct Fixture {
    store: Rc<SharedPlayerStore>,
    provider: Rc<SlotProvider>,
    controls: Controls,
}

fn fixture() -> Fixture {
    let store = Rc::new(SharedPlayerStore::new());
    let provider = SlotProvider::new();
    let controls = PlaybackSync::new(Rc::clone(&store), Rc::clone(&provider), 75);
    Fixture {
        store,
        provider,
        controls,
    }
}

/// Select `index` in a two-song album with a fresh handle, then reconcile
fn select_with_handle(f: &mut Fixture, index: usize) -> Rc<CountingHandle> {
    let album = vec![song("a", 180.0), song("b", 200.0)];
    let handle = CountingHandle::with_song(album[index].clone());
    f.provider.set(Some(Rc::clone(&handle) as Rc<dyn AudioHandle>));
    f.store.play_album(album, index);
    f.controls.reconcile();
    handle
}

#[test]
fn test_starts_unbound_with_disabled_controls() {
    let f = fixture();

    assert_eq!(f.controls.state(), SyncState::Unbound);
    assert!(!f.controls.controls_enabled());
    assert_eq!(f.controls.volume_percent(), 75);

    let view = f.controls.view();
    assert!(!view.controls_enabled);
    assert!(view.now_playing.is_none());
    assert!(view.current_time_label.is_none());
    assert!(view.duration_label.is_none());
}

#[test]
fn test_bind_subscribes_all_channels_and_applies_volume() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);

    assert_eq!(f.controls.state(), SyncState::Bound { handle_attached: true });
    assert_eq!(handle.total_listeners(), 3);
    assert_eq!(handle.volume(), 0.75);
    assert_eq!(f.controls.current_song().unwrap().id.as_str(), "a");

    // Same song again: no re-bind
    assert!(!f.controls.reconcile());
    assert_eq!(handle.total_listeners(), 3);
    assert_eq!(f.provider.acquisitions.get(), 1);
}

#[test]
fn test_notifications_update_display() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);

    handle.emit(AudioNotification::MetadataLoaded { duration: 185.0 });
    handle.emit(AudioNotification::TimeUpdate { current_time: 42.3 });

    assert_eq!(f.controls.current_time_seconds(), 42.3);
    assert_eq!(f.controls.duration_seconds(), 185.0);

    let view = f.controls.view();
    assert_eq!(view.current_time_label.as_deref(), Some("0:42"));
    assert_eq!(view.duration_label.as_deref(), Some("3:05"));
    assert_eq!(view.seek_max, 185.0);
}

#[test]
fn test_ended_pauses_store_without_advancing() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);
    assert!(f.store.is_playing());
    assert_eq!(f.controls.view().play_icon, PlayIcon::Pause);

    handle.emit(AudioNotification::Ended);

    assert!(!f.store.is_playing());
    assert_eq!(f.controls.view().play_icon, PlayIcon::Play);
    assert_eq!(f.store.current_song().unwrap().id.as_str(), "a");
    assert!(!f.controls.reconcile());
}

#[test]
fn test_rebind_leaves_exactly_one_subscription() {
    let mut f = fixture();
    let first = select_with_handle(&mut f, 0);
    first.emit(AudioNotification::TimeUpdate { current_time: 10.0 });

    let second = CountingHandle::with_song(song("b", 200.0));
    f.provider.set(Some(Rc::clone(&second) as Rc<dyn AudioHandle>));
    assert!(f.controls.play_next());
    assert!(f.controls.reconcile());

    assert_eq!(first.total_listeners(), 0);
    assert_eq!(second.total_listeners(), 3);
    assert_eq!(f.controls.current_song().unwrap().id.as_str(), "b");
    // Display reset for the new song
    assert_eq!(f.controls.current_time_seconds(), 0.0);

    // The detached handle can no longer reach the display
    first.emit(AudioNotification::TimeUpdate { current_time: 99.0 });
    first.emit(AudioNotification::Ended);
    assert_eq!(f.controls.current_time_seconds(), 0.0);
    assert!(f.store.is_playing());

    second.emit(AudioNotification::TimeUpdate { current_time: 5.0 });
    assert_eq!(f.controls.view().current_time_label.as_deref(), Some("0:05"));
}

#[test]
fn test_stale_handle_ignoring_removal_is_still_ignored() {
    let mut f = fixture();
    let deaf = Rc::new(DeafHandle::default());
    f.provider.set(Some(Rc::clone(&deaf) as Rc<dyn AudioHandle>));
    f.store.play_album(vec![song("a", 60.0), song("b", 60.0)], 0);
    f.controls.reconcile();

    let next = CountingHandle::with_song(song("b", 60.0));
    f.provider.set(Some(Rc::clone(&next) as Rc<dyn AudioHandle>));
    f.store.play_next();
    f.controls.reconcile();

    // Old listeners are still attached to the deaf handle
    assert_eq!(deaf.listener_count(sonara_common::events::NotificationKind::TimeUpdate), 1);
    deaf.emit(AudioNotification::TimeUpdate { current_time: 30.0 });
    deaf.emit(AudioNotification::MetadataLoaded { duration: 60.0 });
    deaf.emit(AudioNotification::Ended);

    assert_eq!(f.controls.current_time_seconds(), 0.0);
    assert_eq!(f.controls.duration_seconds(), 0.0);
    assert!(f.store.is_playing());
}

#[test]
fn test_missing_handle_leaves_controls_inert() {
    let mut f = fixture();
    let first = select_with_handle(&mut f, 0);

    // Next song but no audio resource available
    f.provider.set(None);
    f.store.play_next();
    f.controls.reconcile();

    assert_eq!(first.total_listeners(), 0);
    assert_eq!(f.controls.state(), SyncState::Bound { handle_attached: false });
    assert!(f.controls.controls_enabled());
    assert!(!f.controls.seek(10.0));
    // Volume still tracked locally
    assert!(f.controls.set_volume(30));
    assert_eq!(f.controls.volume_percent(), 30);

    // Same song, handle appears: stays inert until the song changes
    let late = CountingHandle::with_song(song("b", 200.0));
    f.provider.set(Some(Rc::clone(&late) as Rc<dyn AudioHandle>));
    assert!(!f.controls.reconcile());
    assert_eq!(late.total_listeners(), 0);

    // Song change picks it up, with the local volume applied
    f.store.play_previous();
    f.controls.reconcile();
    assert_eq!(late.total_listeners(), 3);
    assert_eq!(late.volume(), 0.3);
}

#[test]
fn test_clearing_song_unbinds_and_disables_gestures() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);
    handle.emit(AudioNotification::TimeUpdate { current_time: 12.0 });
    let mutations = handle.mutation_count();

    f.store.set_current_song(None);
    assert!(f.controls.reconcile());

    assert_eq!(f.controls.state(), SyncState::Unbound);
    assert_eq!(handle.total_listeners(), 0);
    assert_eq!(f.controls.current_time_seconds(), 0.0);

    let revision = f.store.revision();
    assert!(!f.controls.toggle_play());
    assert!(!f.controls.play_next());
    assert!(!f.controls.play_previous());
    assert!(!f.controls.seek(3.0));
    assert!(!f.controls.set_volume(10));

    assert_eq!(f.store.revision(), revision);
    assert_eq!(f.controls.volume_percent(), 75);
    assert_eq!(handle.mutation_count(), mutations);
}

#[test]
fn test_set_volume_maps_percent_to_native_volume() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);

    for percent in 0..=100 {
        assert!(f.controls.set_volume(percent));
        assert_eq!(f.controls.volume_percent() as i32, percent);
        assert_eq!(handle.volume(), f64::from(percent) / 100.0);
    }
}

#[test]
fn test_set_volume_clamps_out_of_range_input() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);

    f.controls.set_volume(-20);
    assert_eq!(f.controls.volume_percent(), 0);
    assert_eq!(handle.volume(), 0.0);

    f.controls.set_volume(250);
    assert_eq!(f.controls.volume_percent(), 100);
    assert_eq!(handle.volume(), 1.0);
}

#[test]
fn test_seek_passes_target_through_to_resource() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);
    handle.element.load_metadata();

    assert!(f.controls.seek(500.0));
    assert!(f.controls.seek(-1.0));
    assert!(f.controls.seek(61.5));

    // Unvalidated on the way in
    assert_eq!(*handle.seeks.borrow(), vec![500.0, -1.0, 61.5]);
    // Displayed time follows the resource's own clamping via time updates
    assert_eq!(f.controls.current_time_seconds(), 61.5);
    assert_eq!(f.controls.view().current_time_label.as_deref(), Some("1:01"));
}

#[test]
fn test_transport_gestures_delegate_to_store() {
    let mut f = fixture();
    select_with_handle(&mut f, 0);

    assert!(f.controls.toggle_play());
    assert!(!f.store.is_playing());
    assert!(f.controls.toggle_play());
    assert!(f.store.is_playing());

    assert!(f.controls.play_next());
    assert_eq!(f.store.current_index(), Some(1));
    // Binding follows only once reconciled
    assert_eq!(f.controls.current_song().unwrap().id.as_str(), "a");
    f.controls.reconcile();
    assert_eq!(f.controls.current_song().unwrap().id.as_str(), "b");
}

#[test]
fn test_drop_releases_subscription() {
    let mut f = fixture();
    let handle = select_with_handle(&mut f, 0);
    assert_eq!(handle.total_listeners(), 3);

    drop(f.controls);

    assert_eq!(handle.total_listeners(), 0);
}

#[test]
fn test_events_published_on_bus() {
    let store = Rc::new(SharedPlayerStore::new());
    let provider = SlotProvider::new();
    let bus = EventBus::new(32);
    let mut rx = bus.subscribe();
    let mut controls = PlaybackSync::new(Rc::clone(&store), Rc::clone(&provider), 50)
        .with_event_bus(bus.clone());

    let handle = CountingHandle::with_song(song("a", 90.0));
    provider.set(Some(Rc::clone(&handle) as Rc<dyn AudioHandle>));
    store.play_album(vec![song("a", 90.0)], 0);
    controls.reconcile();
    handle.emit(AudioNotification::MetadataLoaded { duration: 90.0 });
    handle.emit(AudioNotification::TimeUpdate { current_time: 1.0 });
    controls.set_volume(80);
    handle.emit(AudioNotification::Ended);
    store.set_current_song(None);
    controls.reconcile();

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let PlaybackEvent::SongBound { handle_attached, .. } = &event {
            assert!(*handle_attached);
        }
        names.push(event.event_type());
    }
    assert_eq!(
        names,
        vec![
            "SongBound",
            "DurationChanged",
            "PlaybackProgress",
            "VolumeChanged",
            "PlaybackEnded",
            "SongUnbound",
        ]
    );
}
