//! Test the push-to-talk state tracker: active sets, history, snapshots.

use intercom_core::ptt::{PttState, PttStatus};
use intercom_core::{ChannelId, TabletId};

#[test]
fn concurrent_speakers_snapshot_matches_scenario_s4() {
    let mut ptt = PttState::new(4);
    ptt.request(TabletId(1), ChannelId(1), None);
    ptt.request(TabletId(3), ChannelId(1), None);
    ptt.request(TabletId(5), ChannelId(2), None);
    let snap = ptt.snapshot();
    assert_eq!(snap.channels[0], vec![TabletId(1), TabletId(3)]);
    assert_eq!(snap.channels[1], vec![TabletId(5)]);
    assert_eq!(snap.channels[2], Vec::<TabletId>::new());
    assert_eq!(snap.channels[3], Vec::<TabletId>::new());

    ptt.release(TabletId(1), ChannelId(1));
    let snap = ptt.snapshot();
    assert_eq!(snap.channels[0], vec![TabletId(3)]);
}

#[test]
fn repeated_request_is_idempotent_on_the_set() {
    // Property 7.
    let mut ptt = PttState::new(1);
    for _ in 0..5 {
        ptt.request(TabletId(1), ChannelId(1), None);
    }
    let (status, active) = ptt.channel_state(ChannelId(1));
    assert_eq!(status, PttStatus::Active);
    assert_eq!(active, vec![TabletId(1)]);
    assert_eq!(ptt.history().count(), 5);

    ptt.release(TabletId(1), ChannelId(1));
    let (status, active) = ptt.channel_state(ChannelId(1));
    assert_eq!(status, PttStatus::Idle);
    assert!(active.is_empty());
}

#[test]
fn release_while_idle_is_a_set_noop_but_still_logs() {
    let mut ptt = PttState::new(1);
    ptt.release(TabletId(1), ChannelId(1));
    assert!(ptt.channel_state(ChannelId(1)).1.is_empty());
    assert_eq!(ptt.history().count(), 1);
}

#[test]
fn tablets_channels_lists_every_channel_a_tablet_is_active_on() {
    let mut ptt = PttState::new(4);
    ptt.request(TabletId(7), ChannelId(2), None);
    ptt.request(TabletId(7), ChannelId(4), None);
    assert_eq!(
        ptt.tablets_channels(TabletId(7)),
        vec![ChannelId(2), ChannelId(4)]
    );
}

#[test]
fn history_is_capped_and_evicts_oldest() {
    let mut ptt = PttState::with_capacity(1, 3);
    for _ in 0..10 {
        ptt.request(TabletId(1), ChannelId(1), None);
    }
    assert_eq!(ptt.history().count(), 3);
}
