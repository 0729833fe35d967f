//! Push-to-talk state tracker (§4.E): who is transmitting where, plus an
//! append-only, capped history log.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::ids::{ChannelId, TabletId};

/// Default cap on the history ring buffer (`spec.md` §9's open question,
/// resolved in favor of a bound rather than unbounded growth).
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;

#[derive(Copy, Clone, Eq, PartialEq, Debug, serde::Serialize)]
pub enum PttAction {
    Request,
    Release,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, serde::Serialize)]
pub enum PttStatus {
    Active,
    Idle,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct PttEvent {
    pub ts: Duration,
    pub tablet: TabletId,
    pub channel: ChannelId,
    pub action: PttAction,
    pub priority: Option<u8>,
}

/// A point-in-time, internally consistent view across every channel
/// (`spec.md` §8 property 8: no torn reads across channels).
#[derive(Clone, Debug)]
pub struct PttSnapshot {
    pub ts: Duration,
    /// `channels[c.index()]` is the sorted list of active tablets on channel `c`.
    pub channels: Vec<Vec<TabletId>>,
}

/// Per-channel sets of active tablets, plus a capped append-only history.
/// Both live behind one lock in the facade so channel-set reads and history
/// appends share a single atomic view (`spec.md` §5).
pub struct PttState {
    num_channels: u16,
    active: Vec<BTreeSet<TabletId>>,
    history: VecDeque<PttEvent>,
    history_capacity: usize,
}

impl PttState {
    pub fn new(num_channels: u16) -> Self {
        Self::with_capacity(num_channels, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(num_channels: u16, history_capacity: usize) -> Self {
        PttState {
            num_channels,
            active: (0..num_channels).map(|_| BTreeSet::new()).collect(),
            history: VecDeque::with_capacity(history_capacity.min(1024)),
            history_capacity,
        }
    }

    fn push_history(&mut self, event: PttEvent) {
        if self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// Mark `tablet` active on `channel`. Idempotent on the set; always logs.
    pub fn request(
        &mut self,
        tablet: TabletId,
        channel: ChannelId,
        priority: Option<u8>,
    ) -> PttStatus {
        self.active[channel.index()].insert(tablet);
        self.push_history(PttEvent {
            ts: now(),
            tablet,
            channel,
            action: PttAction::Request,
            priority,
        });
        PttStatus::Active
    }

    /// Clear `tablet` from `channel`. A no-op on the set if not active;
    /// always logs.
    pub fn release(&mut self, tablet: TabletId, channel: ChannelId) -> PttStatus {
        self.active[channel.index()].remove(&tablet);
        self.push_history(PttEvent {
            ts: now(),
            tablet,
            channel,
            action: PttAction::Release,
            priority: None,
        });
        PttStatus::Idle
    }

    /// Status and sorted active-tablet list for one channel.
    pub fn channel_state(&self, channel: ChannelId) -> (PttStatus, Vec<TabletId>) {
        let set = &self.active[channel.index()];
        let status = if set.is_empty() {
            PttStatus::Idle
        } else {
            PttStatus::Active
        };
        (status, set.iter().copied().collect())
    }

    /// Sorted list of channels on which `tablet` is active.
    pub fn tablets_channels(&self, tablet: TabletId) -> Vec<ChannelId> {
        (0..self.num_channels)
            .map(ChannelId)
            .filter(|&c| self.active[c.index()].contains(&tablet))
            .collect()
    }

    /// Atomic point-in-time view across every channel.
    pub fn snapshot(&self) -> PttSnapshot {
        PttSnapshot {
            ts: now(),
            channels: self
                .active
                .iter()
                .map(|set| set.iter().copied().collect())
                .collect(),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &PttEvent> {
        self.history.iter()
    }
}

fn now() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}
