//! Plain, serializable shapes matching the wire records in `spec.md` §6.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::config::CoreConfig;

#[derive(Clone, Debug, Serialize)]
pub struct HealthRecord {
    pub status: &'static str,
    pub ts: Duration,
    pub num_channels: u16,
    pub num_tablets: u16,
    pub fs: u32,
    pub frame_size: usize,
    pub config: CoreConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct VuLevelsRecord {
    pub tablets: HashMap<u16, f32>,
    pub channels: HashMap<u16, f32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MixConfigView {
    pub num_channels: u16,
    pub num_tablets: u16,
    pub headroom_db: f32,
    /// Row-major `uplink[c][t]`, dense (absent entries are `0.0`, per §3).
    pub uplink: Vec<f32>,
    /// Row-major `downlink[t][c]`.
    pub downlink: Vec<f32>,
    pub tablet_mute: Vec<bool>,
    pub channel_mute: Vec<bool>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PttView {
    pub ts: Duration,
    pub channels: HashMap<u16, Vec<u16>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StateRecord {
    pub ts: Duration,
    pub vu_db: VuLevelsRecord,
    pub config: MixConfigView,
    pub ptt: PttView,
}
