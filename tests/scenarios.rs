//! End-to-end scenarios from the spec's testable-properties section,
//! driven entirely through the public facade.

use std::sync::Arc;

use intercom_core::{ChannelId, CoreConfig, IntercomCore, NullSink, TabletId};

const FS: u32 = 44_100;
const N: usize = 1024;
const C: u16 = 4;
const T: u16 = 16;

fn build_core() -> IntercomCore {
    IntercomCore::new(
        CoreConfig {
            fs: FS,
            frame_size: N,
            headroom_db: 12.0,
        },
        C,
        T,
        Arc::new(NullSink),
    )
    .unwrap()
}

fn sine_pcm(amplitude: f32, freq_hz: f32) -> Vec<i16> {
    let floats: Vec<f32> = (0..N)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / FS as f32).sin())
        .collect();
    let mut pcm = vec![0i16; N];
    intercom_core::convert::to_pcm16(&floats, &mut pcm);
    pcm
}

#[test]
fn s4_ptt_concurrent_speakers_and_release() {
    let core = build_core();
    core.ptt_request(TabletId(1), ChannelId(1), None).unwrap();
    core.ptt_request(TabletId(3), ChannelId(1), None).unwrap();
    core.ptt_request(TabletId(5), ChannelId(2), None).unwrap();

    let (status1, active1) = core.channel_state(ChannelId(1)).unwrap();
    assert_eq!(active1, vec![TabletId(1), TabletId(3)]);
    assert!(matches!(status1, intercom_core::PttStatus::Active));

    let (_, active2) = core.channel_state(ChannelId(2)).unwrap();
    assert_eq!(active2, vec![TabletId(5)]);

    let (status3, active3) = core.channel_state(ChannelId(3)).unwrap();
    assert!(active3.is_empty());
    assert!(matches!(status3, intercom_core::PttStatus::Idle));

    core.ptt_release(TabletId(1), ChannelId(1)).unwrap();
    let (_, active1_after) = core.channel_state(ChannelId(1)).unwrap();
    assert_eq!(active1_after, vec![TabletId(3)]);
}

#[test]
fn s5_partial_matrix_update_leaves_other_entries_alone() {
    let core = build_core();
    let mut update = std::collections::HashMap::new();
    update.insert((1u16, 2u16), 0.5f32);
    core.merge_uplink(&update).unwrap();

    let state = core.state_snapshot();
    let idx = |c: u16, t: u16| (c as usize - 1) * T as usize + (t as usize - 1);
    assert_eq!(state.config.uplink[idx(1, 2)], 0.5);

    let default_gain = 10f32.powf(-12.0 / 20.0);
    assert!((state.config.uplink[idx(2, 1)] - default_gain).abs() < 1.0e-6);
}

#[test]
fn s6_validation_rejects_bad_headroom_and_bad_id_without_mutating_state() {
    let core = build_core();
    let before = core.health().config.headroom_db;
    let err = core.set_headroom_db(-1.0).unwrap_err();
    assert!(matches!(
        err,
        intercom_core::CoreError::BadHeadroom { headroom_db } if headroom_db == -1.0
    ));
    assert_eq!(core.health().config.headroom_db, before);

    let mut update = std::collections::HashMap::new();
    update.insert((1u16, 99u16), 0.1f32);
    let err = core.merge_uplink(&update).unwrap_err();
    assert!(matches!(
        err,
        intercom_core::CoreError::BadId { id: 99, max: 16 }
    ));
}

#[test]
fn end_to_end_push_tick_pull_produces_bounded_pcm() {
    let core = build_core();
    core.push_tablet_frame_pcm16(TabletId(1), &sine_pcm(0.5, 1000.0))
        .unwrap();
    core.tick();

    let mut out = vec![0i16; N];
    core.pull_channel_frame_pcm16(ChannelId(1), &mut out)
        .unwrap();
    assert!(out.iter().all(|&s| s >= i16::MIN && s <= i16::MAX));
    assert!(out.iter().any(|&s| s != 0));

    core.pull_tablet_frame_pcm16(TabletId(2), &mut out).unwrap();
    assert!(out.iter().all(|&s| s == 0));
}

#[test]
fn reconfiguring_mismatched_fs_is_reported_without_aborting() {
    let core = build_core();
    let err = core
        .reload_config(CoreConfig {
            fs: 48_000,
            frame_size: N,
            headroom_db: 9.0,
        })
        .unwrap_err();
    assert!(matches!(err, intercom_core::CoreError::ConfigMismatch { .. }));
    // Headroom still live-applied despite the mismatch.
    assert_eq!(core.health().config.headroom_db, 9.0);
    // The core keeps ticking after a reported mismatch.
    core.tick();
}
