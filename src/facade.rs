//! Control facade (§4.F): the thread-safe surface the outside world calls.
//!
//! Concurrency discipline follows `spec.md` §5 and §9: configuration, PTT
//! state, and each per-stream buffer each have their own short-held
//! `parking_lot` lock; nothing is held across `tick()`'s DSP work or across
//! any call into `EventSink`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::buffer::FrameBank;
use crate::config::{CoreConfig, MatrixUpdate, MixConfig};
use crate::engine::Engine;
use crate::error::{CoreError, Result};
use crate::events::{CoreEvent, EventSink};
use crate::ids::{ChannelId, TabletId};
use crate::ptt::{PttState, PttStatus};
use crate::records::{HealthRecord, MixConfigView, PttView, StateRecord, VuLevelsRecord};
use crate::vu::VuLevels;

/// The whole intercom mixing core: one explicit object graph built once at
/// process start (`spec.md` §9: "no global state is required").
pub struct IntercomCore {
    fs: u32,
    frame_size: usize,
    num_channels: u16,
    num_tablets: u16,

    config: Mutex<MixConfig>,
    ptt: Mutex<PttState>,
    vu: Mutex<VuLevels>,
    engine: Mutex<Engine>,

    tablet_in: FrameBank,
    tablet_out: FrameBank,
    channel_in: FrameBank,
    channel_out: FrameBank,

    tick_count: AtomicU64,
    sink: Arc<dyn EventSink>,
}

impl IntercomCore {
    /// Build the core with `num_channels` channels and `num_tablets` tablets.
    /// `config.fs`/`config.frame_size` become fixed for the process lifetime
    /// (`spec.md` §4.C: "reconfiguring N requires a restart").
    pub fn new(
        config: CoreConfig,
        num_channels: u16,
        num_tablets: u16,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        if !(0.0..=60.0).contains(&config.headroom_db) || !config.headroom_db.is_finite() {
            return Err(CoreError::BadHeadroom {
                headroom_db: config.headroom_db,
            });
        }

        let mut mix_config = MixConfig::default_for(num_channels, num_tablets);
        mix_config.set_headroom_db(config.headroom_db)?;

        Ok(IntercomCore {
            fs: config.fs,
            frame_size: config.frame_size,
            num_channels,
            num_tablets,
            config: Mutex::new(mix_config),
            ptt: Mutex::new(PttState::new(num_channels)),
            vu: Mutex::new(VuLevels::new(num_tablets as usize, num_channels as usize)),
            engine: Mutex::new(Engine::new(num_channels, num_tablets, config.frame_size)),
            tablet_in: FrameBank::new(num_tablets as usize, config.frame_size),
            tablet_out: FrameBank::new(num_tablets as usize, config.frame_size),
            channel_in: FrameBank::new(num_channels as usize, config.frame_size),
            channel_out: FrameBank::new(num_channels as usize, config.frame_size),
            tick_count: AtomicU64::new(0),
            sink,
        })
    }

    // ---- Frame I/O (§4.F, §6) -------------------------------------------

    pub fn push_tablet_frame_pcm16(&self, t: TabletId, samples: &[i16]) -> Result<()> {
        self.validate_tablet(t)?;
        self.validate_frame_len(samples.len())?;
        self.tablet_in.push_pcm16(t.index(), samples);
        Ok(())
    }

    pub fn push_channel_frame_pcm16(&self, c: ChannelId, samples: &[i16]) -> Result<()> {
        self.validate_channel(c)?;
        self.validate_frame_len(samples.len())?;
        self.channel_in.push_pcm16(c.index(), samples);
        Ok(())
    }

    pub fn pull_tablet_frame_pcm16(&self, t: TabletId, out: &mut [i16]) -> Result<()> {
        self.validate_tablet(t)?;
        self.validate_frame_len(out.len())?;
        self.tablet_out.pull_pcm16(t.index(), out);
        Ok(())
    }

    pub fn pull_channel_frame_pcm16(&self, c: ChannelId, out: &mut [i16]) -> Result<()> {
        self.validate_channel(c)?;
        self.validate_frame_len(out.len())?;
        self.channel_out.pull_pcm16(c.index(), out);
        Ok(())
    }

    // ---- Engine tick ------------------------------------------------------

    /// Run one mixing step. The configuration observed is a point-in-time
    /// snapshot taken at entry; concurrent mutations apply to the next tick.
    pub fn tick(&self) {
        let started = Instant::now();
        let snapshot = self.config.lock().snapshot();
        let mut engine = self.engine.lock();
        let mut vu = self.vu.lock();
        engine.tick(
            &snapshot,
            &self.tablet_in,
            &self.channel_in,
            &self.channel_out,
            &self.tablet_out,
            &mut vu,
        );
        drop(engine);
        drop(vu);
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.sink.emit(CoreEvent::TickCompleted {
            tick,
            duration: started.elapsed(),
        });
    }

    // ---- Configuration mutators (§4.B via §4.F) ---------------------------

    pub fn set_uniform_routing(&self, gain_db: f32) {
        self.config.lock().set_uniform_routing(gain_db);
        self.sink.emit(CoreEvent::ConfigUpdated);
    }

    pub fn merge_uplink(&self, update: &MatrixUpdate) -> Result<()> {
        let result = self.config.lock().merge_uplink(update);
        self.report_mutation(&result);
        result
    }

    pub fn merge_downlink(&self, update: &MatrixUpdate) -> Result<()> {
        let result = self.config.lock().merge_downlink(update);
        self.report_mutation(&result);
        result
    }

    pub fn set_tablet_mute(&self, t: TabletId, muted: bool) -> Result<()> {
        let result = self.config.lock().set_tablet_mute(t, muted);
        self.report_mutation(&result);
        result
    }

    pub fn set_channel_mute(&self, c: ChannelId, muted: bool) -> Result<()> {
        let result = self.config.lock().set_channel_mute(c, muted);
        self.report_mutation(&result);
        result
    }

    pub fn set_headroom_db(&self, headroom_db: f32) -> Result<()> {
        let result = self.config.lock().set_headroom_db(headroom_db);
        self.report_mutation(&result);
        result
    }

    /// Compare a reloaded config's `fs`/`frame_size` against the construction
    /// constants (§6): mismatch is reported through the sink and returned as
    /// an error, but `headroom_db` is still live-applied either way.
    pub fn reload_config(&self, config: CoreConfig) -> Result<()> {
        self.config.lock().set_headroom_db(config.headroom_db)?;
        self.sink.emit(CoreEvent::ConfigUpdated);
        if config.fs != self.fs || config.frame_size != self.frame_size {
            self.sink.emit(CoreEvent::ConfigMismatch {
                expected_fs: self.fs,
                got_fs: config.fs,
                expected_frame_size: self.frame_size,
                got_frame_size: config.frame_size,
            });
            return Err(CoreError::ConfigMismatch {
                expected_fs: self.fs,
                got_fs: config.fs,
                expected_frame_size: self.frame_size,
                got_frame_size: config.frame_size,
            });
        }
        Ok(())
    }

    fn report_mutation(&self, result: &Result<()>) {
        match result {
            Ok(()) => self.sink.emit(CoreEvent::ConfigUpdated),
            Err(e) => self.sink.emit(CoreEvent::ValidationRejected {
                reason: e.to_string(),
            }),
        }
    }

    // ---- PTT (§4.E via §4.F) ----------------------------------------------

    pub fn ptt_request(
        &self,
        tablet: TabletId,
        channel: ChannelId,
        priority: Option<u8>,
    ) -> Result<PttStatus> {
        self.validate_tablet(tablet)?;
        self.validate_channel(channel)?;
        let status = self.ptt.lock().request(tablet, channel, priority);
        self.sink.emit(CoreEvent::PttChanged {
            tablet,
            channel,
            action: crate::ptt::PttAction::Request,
        });
        Ok(status)
    }

    pub fn ptt_release(&self, tablet: TabletId, channel: ChannelId) -> Result<PttStatus> {
        self.validate_tablet(tablet)?;
        self.validate_channel(channel)?;
        let status = self.ptt.lock().release(tablet, channel);
        self.sink.emit(CoreEvent::PttChanged {
            tablet,
            channel,
            action: crate::ptt::PttAction::Release,
        });
        Ok(status)
    }

    pub fn channel_state(&self, channel: ChannelId) -> Result<(PttStatus, Vec<TabletId>)> {
        self.validate_channel(channel)?;
        Ok(self.ptt.lock().channel_state(channel))
    }

    pub fn tablets_channels(&self, tablet: TabletId) -> Result<Vec<ChannelId>> {
        self.validate_tablet(tablet)?;
        Ok(self.ptt.lock().tablets_channels(tablet))
    }

    // ---- Snapshots (§4.F, §6) ----------------------------------------------

    pub fn health(&self) -> HealthRecord {
        let config = self.config.lock();
        HealthRecord {
            status: "ok",
            ts: wall_clock(),
            num_channels: self.num_channels,
            num_tablets: self.num_tablets,
            fs: self.fs,
            frame_size: self.frame_size,
            config: CoreConfig {
                fs: self.fs,
                frame_size: self.frame_size,
                headroom_db: config.headroom_db(),
            },
        }
    }

    pub fn vu_levels_db(&self) -> VuLevelsRecord {
        let vu = self.vu.lock();
        VuLevelsRecord {
            tablets: (0..self.num_tablets)
                .map(|i| (i + 1, vu.tablet_dbfs(i as usize)))
                .collect(),
            channels: (0..self.num_channels)
                .map(|i| (i + 1, vu.channel_dbfs(i as usize)))
                .collect(),
        }
    }

    /// `{vu, config, ptt}`, each internally consistent but not guaranteed
    /// consistent with each other (`spec.md` §5).
    pub fn state_snapshot(&self) -> StateRecord {
        let vu_db = self.vu_levels_db();
        let config = self.config.lock();
        let config_view = MixConfigView {
            num_channels: self.num_channels,
            num_tablets: self.num_tablets,
            headroom_db: config.headroom_db(),
            uplink: (0..self.num_channels)
                .flat_map(|c| {
                    (0..self.num_tablets)
                        .map(move |t| config.uplink_weight(ChannelId(c + 1), TabletId(t + 1)))
                })
                .collect(),
            downlink: (0..self.num_tablets)
                .flat_map(|t| {
                    (0..self.num_channels)
                        .map(move |c| config.downlink_weight(TabletId(t + 1), ChannelId(c + 1)))
                })
                .collect(),
            tablet_mute: (0..self.num_tablets)
                .map(|t| config.tablet_muted(TabletId(t + 1)))
                .collect(),
            channel_mute: (0..self.num_channels)
                .map(|c| config.channel_muted(ChannelId(c + 1)))
                .collect(),
        };
        drop(config);

        let ptt_snapshot = self.ptt.lock().snapshot();
        let ptt_view = PttView {
            ts: ptt_snapshot.ts,
            channels: ptt_snapshot
                .channels
                .into_iter()
                .enumerate()
                .map(|(i, tablets)| ((i + 1) as u16, tablets.into_iter().map(|t| t.0).collect()))
                .collect(),
        };

        StateRecord {
            ts: wall_clock(),
            vu_db,
            config: config_view,
            ptt: ptt_view,
        }
    }

    // ---- Validation --------------------------------------------------------

    fn validate_tablet(&self, t: TabletId) -> Result<()> {
        if t.is_valid(self.num_tablets) {
            Ok(())
        } else {
            let err = CoreError::BadId {
                id: t.0,
                max: self.num_tablets,
            };
            self.sink.emit(CoreEvent::ValidationRejected {
                reason: err.to_string(),
            });
            Err(err)
        }
    }

    fn validate_channel(&self, c: ChannelId) -> Result<()> {
        if c.is_valid(self.num_channels) {
            Ok(())
        } else {
            let err = CoreError::BadId {
                id: c.0,
                max: self.num_channels,
            };
            self.sink.emit(CoreEvent::ValidationRejected {
                reason: err.to_string(),
            });
            Err(err)
        }
    }

    fn validate_frame_len(&self, len: usize) -> Result<()> {
        if len == self.frame_size {
            Ok(())
        } else {
            let err = CoreError::BadFrameLength {
                expected: self.frame_size,
                got: len,
            };
            self.sink.emit(CoreEvent::ValidationRejected {
                reason: err.to_string(),
            });
            Err(err)
        }
    }
}

fn wall_clock() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}
