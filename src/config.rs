//! Mix configuration: routing matrices, mutes, headroom (§3, §4.B).
//!
//! Matrices are dense row-major arrays (`spec.md` §9's design note): cheap to
//! snapshot by clone, cache-friendly, and trivially wait-free to read once
//! copied out from under the lock.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::ids::{ChannelId, TabletId};
use crate::math::db_amp;

/// Plain, `serde`-shaped construction/reload config (§6).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CoreConfig {
    pub fs: u32,
    pub frame_size: usize,
    pub headroom_db: f32,
}

/// Default gain applied uniformly at startup: -12 dBFS, per `spec.md` §3.
pub const DEFAULT_UNIFORM_GAIN_DB: f32 = -12.0;

/// Mutable routing state, guarded by a mutex in the facade. `snapshot()`
/// produces the cheap immutable copy a single tick mixes against.
#[derive(Clone, Debug)]
pub struct MixConfig {
    num_channels: u16,
    num_tablets: u16,
    /// Row-major `uplink[c * num_tablets + t]`.
    uplink: Vec<f32>,
    /// Row-major `downlink[t * num_channels + c]`.
    downlink: Vec<f32>,
    tablet_mute: Vec<bool>,
    channel_mute: Vec<bool>,
    headroom_db: f32,
}

/// An immutable point-in-time view of [`MixConfig`], cheap to clone and safe
/// to hold lock-free for the duration of one `tick()`.
pub type MixConfigSnapshot = MixConfig;

/// Partial update to a routing matrix: `(channel, tablet) -> gain`, or
/// `(tablet, channel) -> gain` depending on direction. Unlisted pairs keep
/// their current value (§3's "partial merge" rule); a listed gain of `0.0`
/// deletes the entry.
pub type MatrixUpdate = HashMap<(u16, u16), f32>;

impl MixConfig {
    /// A uniform default configuration: all (c,t)/(t,c) pairs routed at
    /// `DEFAULT_UNIFORM_GAIN_DB`, no mutes, 0 dB headroom.
    pub fn default_for(num_channels: u16, num_tablets: u16) -> Self {
        let mut config = MixConfig {
            num_channels,
            num_tablets,
            uplink: vec![0.0; num_channels as usize * num_tablets as usize],
            downlink: vec![0.0; num_tablets as usize * num_channels as usize],
            tablet_mute: vec![false; num_tablets as usize],
            channel_mute: vec![false; num_channels as usize],
            headroom_db: 0.0,
        };
        config.set_uniform_routing(DEFAULT_UNIFORM_GAIN_DB);
        config
    }

    #[inline]
    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    #[inline]
    pub fn num_tablets(&self) -> u16 {
        self.num_tablets
    }

    #[inline]
    pub fn headroom_db(&self) -> f32 {
        self.headroom_db
    }

    #[inline]
    pub fn headroom_linear(&self) -> f32 {
        db_amp(-self.headroom_db)
    }

    #[inline]
    pub fn tablet_muted(&self, t: TabletId) -> bool {
        self.tablet_mute[t.index()]
    }

    #[inline]
    pub fn channel_muted(&self, c: ChannelId) -> bool {
        self.channel_mute[c.index()]
    }

    #[inline]
    fn uplink_index(&self, c: ChannelId, t: TabletId) -> usize {
        c.index() * self.num_tablets as usize + t.index()
    }

    #[inline]
    fn downlink_index(&self, t: TabletId, c: ChannelId) -> usize {
        t.index() * self.num_channels as usize + c.index()
    }

    /// Effective uplink weight: matrix gain zeroed out if the tablet is muted.
    #[inline]
    pub fn uplink_weight(&self, c: ChannelId, t: TabletId) -> f32 {
        if self.tablet_muted(t) {
            0.0
        } else {
            self.uplink[self.uplink_index(c, t)]
        }
    }

    /// Effective downlink weight: matrix gain zeroed out if the channel is muted.
    #[inline]
    pub fn downlink_weight(&self, t: TabletId, c: ChannelId) -> f32 {
        if self.channel_muted(c) {
            0.0
        } else {
            self.downlink[self.downlink_index(t, c)]
        }
    }

    fn validate_id(&self, id: u16, max: u16) -> Result<(), CoreError> {
        if id >= 1 && id <= max {
            Ok(())
        } else {
            Err(CoreError::BadId { id, max })
        }
    }

    fn validate_gain(gain: f32) -> Result<(), CoreError> {
        if gain.is_finite() && gain >= 0.0 {
            Ok(())
        } else {
            Err(CoreError::BadGain { gain })
        }
    }

    fn validate_headroom(headroom_db: f32) -> Result<(), CoreError> {
        if headroom_db.is_finite() && (0.0..=60.0).contains(&headroom_db) {
            Ok(())
        } else {
            Err(CoreError::BadHeadroom { headroom_db })
        }
    }

    /// Populate every (c,t)/(t,c) pair at `gain_db` and clear all mutes.
    /// `gain_db` itself is not bounds-checked against §3's gain invariant
    /// (it's a dB value, converted to a linear gain which is always
    /// non-negative and finite for finite input).
    pub fn set_uniform_routing(&mut self, gain_db: f32) {
        let gain = db_amp(gain_db);
        self.uplink.iter_mut().for_each(|g| *g = gain);
        self.downlink.iter_mut().for_each(|g| *g = gain);
        self.tablet_mute.iter_mut().for_each(|m| *m = false);
        self.channel_mute.iter_mut().for_each(|m| *m = false);
    }

    /// Apply a partial merge to the uplink matrix (§3, §4.B). All-or-nothing:
    /// every entry is validated before any is written.
    pub fn merge_uplink(&mut self, update: &MatrixUpdate) -> Result<(), CoreError> {
        for (&(c, t), &g) in update {
            self.validate_id(c, self.num_channels)?;
            self.validate_id(t, self.num_tablets)?;
            Self::validate_gain(g)?;
        }
        for (&(c, t), &g) in update {
            let idx = self.uplink_index(ChannelId(c), TabletId(t));
            self.uplink[idx] = g;
        }
        Ok(())
    }

    /// Apply a partial merge to the downlink matrix. Same all-or-nothing rule.
    pub fn merge_downlink(&mut self, update: &MatrixUpdate) -> Result<(), CoreError> {
        for (&(t, c), &g) in update {
            self.validate_id(t, self.num_tablets)?;
            self.validate_id(c, self.num_channels)?;
            Self::validate_gain(g)?;
        }
        for (&(t, c), &g) in update {
            let idx = self.downlink_index(TabletId(t), ChannelId(c));
            self.downlink[idx] = g;
        }
        Ok(())
    }

    pub fn set_tablet_mute(&mut self, t: TabletId, muted: bool) -> Result<(), CoreError> {
        self.validate_id(t.0, self.num_tablets)?;
        self.tablet_mute[t.index()] = muted;
        Ok(())
    }

    pub fn set_channel_mute(&mut self, c: ChannelId, muted: bool) -> Result<(), CoreError> {
        self.validate_id(c.0, self.num_channels)?;
        self.channel_mute[c.index()] = muted;
        Ok(())
    }

    pub fn set_headroom_db(&mut self, headroom_db: f32) -> Result<(), CoreError> {
        Self::validate_headroom(headroom_db)?;
        self.headroom_db = headroom_db;
        Ok(())
    }

    /// A cheap, immutable point-in-time copy for one engine tick to mix against.
    pub fn snapshot(&self) -> MixConfigSnapshot {
        self.clone()
    }
}
