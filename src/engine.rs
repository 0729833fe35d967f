//! The mixer engine: per-tick uplink sum, headroom, soft limiter, downlink
//! sum, and VU accumulation (§4.C — the central algorithm).

use crate::buffer::{Frame, FrameBank};
use crate::config::MixConfigSnapshot;
use crate::ids::{ChannelId, TabletId};
use crate::vu::{rms, VuLevels};

/// Scratch buffers owned by the engine, reused every tick so `tick()`
/// performs no heap allocation on its hot path.
pub struct Engine {
    frame_size: usize,
    num_channels: u16,
    num_tablets: u16,
    channel_acc: Vec<Frame>,
    tablet_acc: Vec<Frame>,
    tablet_in_local: Vec<Frame>,
    channel_out_local: Vec<Frame>,
}

impl Engine {
    pub fn new(num_channels: u16, num_tablets: u16, frame_size: usize) -> Self {
        Engine {
            frame_size,
            num_channels,
            num_tablets,
            channel_acc: (0..num_channels)
                .map(|_| Frame::zeroed(frame_size))
                .collect(),
            tablet_acc: (0..num_tablets)
                .map(|_| Frame::zeroed(frame_size))
                .collect(),
            tablet_in_local: (0..num_tablets)
                .map(|_| Frame::zeroed(frame_size))
                .collect(),
            channel_out_local: (0..num_channels)
                .map(|_| Frame::zeroed(frame_size))
                .collect(),
        }
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Run one mixing step against configuration snapshot `config` and the
    /// current contents of `tablet_in`/`channel_in`, writing results into
    /// `channel_out`/`tablet_out` and updating `vu`.
    ///
    /// Sequence, exactly as specified in `spec.md` §4.C:
    /// 1. uplink sum per channel, headroom, `tanh` soft limiter, channel RMS;
    /// 2. downlink sum per tablet from the limited channel outputs, tablet
    ///    RMS computed from what the tablet *sent*, not what it will hear.
    pub fn tick(
        &mut self,
        config: &MixConfigSnapshot,
        tablet_in: &FrameBank,
        channel_in: &FrameBank,
        channel_out: &FrameBank,
        tablet_out: &FrameBank,
        vu: &mut VuLevels,
    ) {
        // Copy current inputs into local scratch under their per-stream locks,
        // then release: no lock is held across the DSP work below.
        for t in 0..self.num_tablets as usize {
            tablet_in.snapshot_into(t, &mut self.tablet_in_local[t]);
        }

        let headroom_linear = config.headroom_linear();

        // 1. Uplink sum -> headroom -> soft limiter -> channel_out, channel_rms.
        for c in 0..self.num_channels as usize {
            let channel_id = ChannelId::from_index(c);
            let acc = self.channel_acc[c].as_mut_slice();
            acc.iter_mut().for_each(|s| *s = 0.0);

            if !config.channel_muted(channel_id) {
                for t in 0..self.num_tablets as usize {
                    let tablet_id = TabletId::from_index(t);
                    let w = config.uplink_weight(channel_id, tablet_id);
                    if w != 0.0 {
                        let input = self.tablet_in_local[t].as_slice();
                        for i in 0..self.frame_size {
                            acc[i] += w * input[i];
                        }
                    }
                }
            }

            for s in acc.iter_mut() {
                *s *= headroom_linear;
            }
            for s in acc.iter_mut() {
                *s = s.tanh();
            }

            vu.set_channel_rms(c, rms(acc));
            self.channel_out_local[c].copy_from(&self.channel_acc[c]);
        }

        for c in 0..self.num_channels as usize {
            channel_out.store(c, &self.channel_out_local[c]);
        }

        // 2. Downlink sum -> tablet_out; tablet_rms reflects what was sent.
        for t in 0..self.num_tablets as usize {
            let tablet_id = TabletId::from_index(t);
            let acc = self.tablet_acc[t].as_mut_slice();
            acc.iter_mut().for_each(|s| *s = 0.0);

            if !config.tablet_muted(tablet_id) {
                for c in 0..self.num_channels as usize {
                    let channel_id = ChannelId::from_index(c);
                    let w = config.downlink_weight(tablet_id, channel_id);
                    if w != 0.0 {
                        let channel_mix = self.channel_out_local[c].as_slice();
                        for i in 0..self.frame_size {
                            acc[i] += w * channel_mix[i];
                        }
                    }
                }
            }

            vu.set_tablet_rms(t, rms(self.tablet_in_local[t].as_slice()));
            tablet_out.store(t, &self.tablet_acc[t]);
        }

        let _ = channel_in; // reserved for external channel-side input routing, unused by this topology.
    }
}
